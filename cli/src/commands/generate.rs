mod runner;
use crate::commands::SharedArgs;
use crate::runner::{Runnable, Runner};
use runner::GenerateRunner;
use std::path::PathBuf;

#[derive(clap::Args, Clone, Debug)]
pub(crate) struct GenerateCommand {
    /// YAML or JSON file with the template properties
    pub(crate) properties: PathBuf,

    /// Resource name, used when the properties do not set one
    #[arg(short, long)]
    pub(crate) name: Option<String>,

    /// Project ID, used when the properties do not set one
    #[arg(short, long)]
    pub(crate) project: Option<String>,

    /// Deployment name passed to the template environment
    #[arg(short, long)]
    pub(crate) deployment: Option<String>,

    #[command(flatten)]
    pub(crate) shared: SharedArgs,
}

impl Runnable for GenerateCommand {
    fn runner(&self) -> impl Runner {
        GenerateRunner {
            command: self.clone(),
        }
    }
}
