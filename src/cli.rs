use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "metalogin",
    about = "Merge freshly provisioned cluster credentials into a local kubeconfig",
    long_about = "Metalogin merges the credentials of a freshly provisioned cluster into a local \
kubeconfig without clobbering unrelated entries.

The source configuration is read from standard input. Its `kubernetes` cluster and
`kubernetes-admin` user are stored under names derived from the cluster server's hostname:
  • cluster  kubernetes-<host>
  • user     kubernetes-admin-<host>
  • context  kubernetes-admin-<host>@kubernetes-<host> (made current)

Merging the same host again updates those entries in place.

Optional settings are read from $XDG_CONFIG_HOME/metalogin/config.toml.

Examples:
  ssh user@my-server \"cat ~/.kube/config\" | metalogin -c ~/.kube/config

  # Preview the merged configuration without writing it
  ssh user@my-server \"cat ~/.kube/config\" | metalogin -c ~/.kube/config --dry-run",
    version,
    author
)]
pub struct Cli {
    /// Kubernetes config file to merge into
    #[arg(short, long, env = "METALOGIN_CONFIG", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Print the merged configuration instead of writing it
    #[arg(short, long)]
    pub dry_run: bool,

    /// Create timestamped backup of the config file before overwriting it
    #[arg(short, long)]
    pub backup: bool,

    /// Enable debug output (shows INFO and DEBUG messages)
    #[arg(long)]
    pub debug: bool,

    /// Enable trace output (shows all log messages including TRACE)
    #[arg(short = 't', long)]
    pub trace: bool,
}
