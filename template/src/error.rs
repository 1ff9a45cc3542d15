/// A required template property is absent
///
/// Travels inside an `eyre::Report`, use `downcast_ref::<MissingProperty>()`
/// to tell it apart from other failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingProperty {
    path: String,
}

impl MissingProperty {
    pub fn new(path: &str) -> Self {
        MissingProperty {
            path: path.to_string(),
        }
    }

    /// Dotted path of the property, e.g. `databases[1].name`
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl std::fmt::Display for MissingProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Missing required property [{}]", self.path)
    }
}

impl std::error::Error for MissingProperty {}
