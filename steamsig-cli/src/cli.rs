use std::path::PathBuf;

use clap::Parser;
use steamsig::Action;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "steamsig-cli")]
#[command(about = "Show the Steam signature of a profile", long_about = None)]
pub struct Cli {
    /// 17-digit Steam ID or vanity URL alias
    pub identifier: String,

    /// `go` prints where a click leads, anything else prints the signature
    #[arg(long, default_value = "img")]
    pub action: Action,

    /// JSON configuration file; the environment is used when absent
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Signature script URL. When set, an alias is answered with the
    /// canonical signature URL of the resolved Steam ID
    #[arg(long)]
    pub redirect_base: Option<Url>,

    /// Use the `profilesig/` form for redirects
    #[arg(long, requires = "redirect_base")]
    pub rewrite: bool,
}
