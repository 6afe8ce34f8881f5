use segmint_engine::commands::score::{self, ScoreRunOptions};
use segmint_engine::commands::template::{self, TemplateRunOptions};
use segmint_engine::{EngineResult, SuccessEnvelope};

use crate::cli::{Cli, Commands};

pub fn dispatch(cli: &Cli) -> EngineResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Score {
            path,
            as_of,
            policy,
            customer,
            segment,
            out,
            json: _,
        } => {
            let as_of_value = as_of
                .as_ref()
                .map(|value| value.as_str().to_string())
                .unwrap_or_else(today_iso);

            score::run_with_options(ScoreRunOptions {
                path: path.clone(),
                as_of: as_of_value,
                policy: policy.clone(),
                customer: customer.clone(),
                segment: segment.clone(),
                out: out.clone(),
                stdin_override: None,
            })
        }
        Commands::Template { out, json: _ } => {
            template::run_with_options(TemplateRunOptions { out: out.clone() })
        }
    }
}

/// Default evaluation date when --as-of is not given. The engine never
/// reads the clock itself, so the wall-clock dependency lives here.
fn today_iso() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}
