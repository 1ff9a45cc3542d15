use spanner_template::MissingProperty;

/// Display global error message in unified format
#[derive(Clone, Debug)]
pub struct Error(String, Option<String>);

impl Error {
    pub fn new(message: &str, details: Option<&str>) -> Self {
        Error(message.to_string(), details.map(|d| d.to_string()))
    }

    pub fn title(&self) -> &str {
        &self.0
    }
}

/// Display the message and details, as sort of a hint
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}\n\n{}",
            self.0,
            console::style(self.1.clone().unwrap_or("".into())).dim()
        )
    }
}

/// Implement std::error::Error trait for Error
impl std::error::Error for Error {}

/// Automatically convert all eyre error reports
impl From<eyre::ErrReport> for Error {
    fn from(error: eyre::ErrReport) -> Self {
        log::error!("{error:?}");

        if let Some(missing) = error.downcast_ref::<MissingProperty>() {
            return Error::new(
                "Missing required property",
                Some(&format!("Set [{}] in the template properties.", missing.path())),
            );
        }

        if let Some(error) = error.downcast_ref::<Error>() {
            return error.clone();
        }

        Error::new(&format!("{error:#}"), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_property_becomes_user_error() {
        let report = eyre::Report::new(MissingProperty::new("nodeCount"));
        let error = Error::from(report);

        assert_eq!(error.title(), "Missing required property");
        assert!(error.to_string().contains("[nodeCount]"));
    }

    #[test]
    fn user_error_survives_context() {
        let report = eyre::Report::new(Error::new("Config not found", None))
            .wrap_err("Failed to load");

        assert_eq!(Error::from(report).title(), "Config not found");
    }
}
