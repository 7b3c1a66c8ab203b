// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand!

    // Zero-arg → String::new()
    () => {
        ::std::string::String::new()
    };
    // Any single expression — works for literals, consts, or vars
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

#[macro_export]
macro_rules! quantity {
    // "1 member", "3 members", "0 members"
    ($n:expr, $noun:expr) => {{
        let n = $n;
        if n == 1 {
            ::std::format!("{} {}", n, $noun)
        } else {
            ::std::format!("{} {}s", n, $noun)
        }
    }};
}
