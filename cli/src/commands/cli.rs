use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Alumni association site front server")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file. Defaults to ./config.toml when present.
    #[arg(long, global = true, env = "ALUMNI_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP server (default).
    Serve(ServeArgs),
    /// Print the Content-Security-Policy the current configuration produces.
    Csp(CspArgs),
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ServeArgs {
    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CspArgs {
    /// Nonce to embed; a fresh one is generated when omitted.
    #[arg(long)]
    pub nonce: Option<String>,

    /// Force the relaxed (development) policy.
    #[arg(long, conflicts_with = "strict")]
    pub relax: bool,

    /// Force the strict (production) policy.
    #[arg(long)]
    pub strict: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let args = Args::try_parse_from(["alumni-site", "serve", "--port", "4000"]).unwrap();
        match args.command {
            Some(Commands::Serve(serve)) => {
                assert_eq!(serve.port, Some(4000));
                assert_eq!(serve.host, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_csp_flags_conflict() {
        assert!(Args::try_parse_from(["alumni-site", "csp", "--relax", "--strict"]).is_err());

        let args =
            Args::try_parse_from(["alumni-site", "--config", "site.toml", "csp", "--nonce", "abc"])
                .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("site.toml")));
        match args.command {
            Some(Commands::Csp(csp)) => assert_eq!(csp.nonce.as_deref(), Some("abc")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand() {
        let args = Args::try_parse_from(["alumni-site"]).unwrap();
        assert!(args.command.is_none());
    }
}
