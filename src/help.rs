use crate::ArgPack;

#[inline(never)]
fn push_str(out: &mut String, s: &str) {
    out.push_str(s);
}

#[cold]
pub(crate) fn render_help_into(out: &mut String, program_name: &str, pack: &ArgPack<'_>) {
    macro_rules! w {
        ($($e:expr),*) => {{
            $(push_str(out, $e);)*
        }};
    }

    // Usage line. Named arguments first, then positional ones in their own order.

    w!("Usage: ", program_name);
    for slot in pack.slots().filter(|slot| !pack.is_positional(slot.name())) {
        w!(" [", slot.name());
        if !pack.is_flag(slot.name()) {
            w!("=value");
        }
        w!("]");
    }
    let mut first = true;
    for name in pack.positional_names() {
        if first {
            first = false;
            w!(" ");
        }
        w!("[", name, "]");
    }

    // List of all arguments.

    w!("\n\nOptions:\n");
    for slot in pack.slots() {
        w!(" ", slot.name(), " - ", slot.description(), "\n");
    }
}
