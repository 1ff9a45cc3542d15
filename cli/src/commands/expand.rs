mod runner;
use crate::commands::SharedArgs;
use crate::runner::{Runnable, Runner};
use runner::ExpandRunner;
use std::path::PathBuf;

#[derive(clap::Args, Clone, Debug)]
pub(crate) struct ExpandCommand {
    /// Deployment Manager config (YAML or JSON)
    pub(crate) config: PathBuf,

    /// Project ID passed to every template
    #[arg(short, long)]
    pub(crate) project: Option<String>,

    /// Deployment name passed to every template
    #[arg(short, long)]
    pub(crate) deployment: Option<String>,

    #[command(flatten)]
    pub(crate) shared: SharedArgs,
}

impl Runnable for ExpandCommand {
    fn runner(&self) -> impl Runner {
        ExpandRunner {
            command: self.clone(),
        }
    }
}
