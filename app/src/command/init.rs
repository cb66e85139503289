use crate::command::CommandStrategy;
use yubot_config::Config;

/// Strategy for writing the configuration template.
pub struct InitStrategy;

impl CommandStrategy for InitStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        Config::create_config()
    }
}
