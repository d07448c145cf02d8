//! `csp` command: print the policy header for inspection.

use alumni_core::api::{build_csp_directive, AppConfig, CspOptions, Nonce};

use crate::commands::cli::CspArgs;
use crate::error::CliError;

pub fn handle_csp(args: CspArgs, cfg: &AppConfig) -> Result<(), CliError> {
    println!("{}", render_policy(&args, cfg)?);
    Ok(())
}

fn render_policy(args: &CspArgs, cfg: &AppConfig) -> Result<String, CliError> {
    let nonce = match &args.nonce {
        Some(token) => Nonce::from_token(token)?,
        None => Nonce::generate()?,
    };

    let relax = if args.relax {
        true
    } else if args.strict {
        false
    } else {
        cfg.relax_csp()
    };

    Ok(build_csp_directive(
        &CspOptions::new(&nonce, relax)
            .analytics_id(cfg.csp.analytics_id.as_deref())
            .api_base(cfg.csp.api_base.as_deref()),
    ))
}
