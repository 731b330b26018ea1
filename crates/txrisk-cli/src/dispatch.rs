use txrisk_client::commands::{self, InputOptions};
use txrisk_client::config::RuleOverrides;
use txrisk_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands, InputArgs, RuleArgs};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Classify {
            input,
            flagged_only,
            output,
            rules,
            json: _,
        } => commands::classify::run(commands::classify::ClassifyOptions {
            input: input_options(input),
            rules: rule_overrides(rules),
            flagged_only: *flagged_only,
            output: output.clone(),
        }),
        Commands::Export {
            input,
            flagged_only,
            output,
            rules,
            json: _,
        } => commands::export::run(commands::export::ExportOptions {
            input: input_options(input),
            rules: rule_overrides(rules),
            flagged_only: *flagged_only,
            output: output.clone(),
        }),
        Commands::Rules { rules, .. } => commands::rules::show(&rule_overrides(rules)),
    }
}

fn input_options(args: &InputArgs) -> InputOptions {
    InputOptions {
        path: args.path.clone(),
        text: args.text.clone(),
        stdin_override: None,
    }
}

fn rule_overrides(args: &RuleArgs) -> RuleOverrides {
    RuleOverrides {
        config_path: args.config.clone(),
        amount_threshold: args.threshold,
        country_allow_list: args.allow_country.clone(),
        time_prefix: args.time_prefix.clone(),
        home_override: None,
    }
}
