pub use puffin;

/// Turns scope collection on or off. Scopes are off until this is called with `true`.
pub fn set_enabled(enabled: bool) {
    puffin::set_scopes_on(enabled);
}

/// Marks a frame boundary, call once per rendered image.
pub fn new_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        $crate::puffin::profile_scope!($name);
    };
    ($name:expr, $data:expr) => {
        $crate::puffin::profile_scope!($name, $data);
    };
}

#[macro_export]
macro_rules! profile_function {
    () => {
        $crate::puffin::profile_function!();
    };
    ($data:expr) => {
        $crate::puffin::profile_function!($data);
    };
}
