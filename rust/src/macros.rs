//! Helper macros for the public API.

/// Generates an infallible method from its `try_` counterpart.
///
/// The generated method panics with the error message when the fallible
/// version fails. Fallible variants only fail on malformed node graphs.
macro_rules! infallible {
    ($(#[$meta:meta])* $vis:vis fn $name:ident(&self $(, $arg:ident: $ty:ty)*) -> $ret:ty) => {
        paste::paste! {
            $(#[$meta])*
            $vis fn $name(&self $(, $arg: $ty)*) -> $ret {
                match self.[<try_ $name>]($($arg),*) {
                    Ok(value) => value,
                    Err(err) => panic!("{} failed: {}", stringify!($name), err),
                }
            }
        }
    };
    ($(#[$meta:meta])* $vis:vis fn $name:ident(&mut self $(, $arg:ident: $ty:ty)*) -> $ret:ty) => {
        paste::paste! {
            $(#[$meta])*
            $vis fn $name(&mut self $(, $arg: $ty)*) -> $ret {
                match self.[<try_ $name>]($($arg),*) {
                    Ok(value) => value,
                    Err(err) => panic!("{} failed: {}", stringify!($name), err),
                }
            }
        }
    };
}

pub(crate) use infallible;
