//! Rule profiles.

/// Named rule list, one per subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Path remap, lazy loading, minified css/js.
    Optimize,
    /// `<picture>` conversion, background urls, lazy loading.
    Picture,
}

impl Profile {
    /// Log module name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Optimize => "optimize",
            Self::Picture => "picture",
        }
    }
}
