//! TT-014: CLI subcommands — list, pick, completions.

use crate::chooser::{Chooser, DialogChooser, FzfChooser};
use crate::core::error::{Error, Result};
use crate::core::parser::{ConfigLoader, FsLoader};
use crate::core::state::{StateInventory, TerraformStateInventory};
use crate::core::types::{Address, Diagnostic, ResolveOptions, Severity};
use crate::core::{manifest, resolver, selection, state};
use crate::transport::{find_in_path, local};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "tftarget",
    version,
    about = "Resolve Terraform resource and module addresses and pick targets interactively"
)]
pub struct Cli {
    /// Log resolution details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every command that resolves addresses.
#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Root configuration directory
    #[arg(short = 'C', long, env = "TFTARGET_CHDIR", default_value = ".")]
    pub chdir: PathBuf,

    /// How many levels to descend into submodules. With --state, root-level
    /// addresses are depth 1, so use -d 1 or more
    #[arg(short, long, env = "TFTARGET_DEPTH", default_value_t = 0)]
    pub depth: usize,

    /// Read addresses from `terraform state list` instead of the configuration
    #[arg(long)]
    pub state: bool,

    /// Terraform binary used for `state list`
    #[arg(long, env = "TFTARGET_TERRAFORM", default_value = "terraform")]
    pub terraform: String,

    /// Fail when the module manifest exists but cannot be read or parsed
    #[arg(long)]
    pub strict_manifest: bool,
}

impl ResolveArgs {
    pub fn options(&self) -> ResolveOptions {
        ResolveOptions {
            root: self.chdir.clone(),
            max_depth: self.depth,
            strict_manifest: self.strict_manifest,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List resolved addresses, one per line
    List {
        #[command(flatten)]
        resolve: ResolveArgs,

        /// Prepended to every listed address
        #[arg(short, long, default_value = "", allow_hyphen_values = true)]
        prefix: String,
    },

    /// Pick addresses interactively and print or run them as targets
    Pick {
        #[command(flatten)]
        resolve: ResolveArgs,

        /// Prepended to every picked address
        #[arg(short, long, env = "TFTARGET_PREFIX", default_value = selection::DEFAULT_PREFIX, allow_hyphen_values = true)]
        prefix: String,

        /// Use fzf instead of the built-in prompt
        #[arg(long)]
        fzf: bool,

        /// Run this command with the trailing args and the picked targets
        #[arg(short = 'x', long)]
        exec: Option<String>,

        /// Arguments passed to the --exec command before the targets
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Print a shell completion script
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

/// Where addresses come from.
pub struct Sources<'a> {
    pub loader: &'a dyn ConfigLoader,
    pub inventory: &'a dyn StateInventory,
}

/// Options of the `pick` command.
#[derive(Debug, Clone, Default)]
pub struct PickOptions {
    pub prefix: String,
    pub exec: Option<String>,
    pub args: Vec<String>,
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cmd {
        Commands::List { resolve, prefix } => {
            let inventory = TerraformStateInventory::new(&resolve.terraform);
            let sources = Sources {
                loader: &FsLoader,
                inventory: &inventory,
            };
            cmd_list(&resolve, &prefix, &sources, &mut out)
        }
        Commands::Pick {
            resolve,
            prefix,
            fzf,
            exec,
            args,
        } => {
            let inventory = TerraformStateInventory::new(&resolve.terraform);
            let sources = Sources {
                loader: &FsLoader,
                inventory: &inventory,
            };
            let chooser: Box<dyn Chooser> = if fzf {
                Box::new(FzfChooser::locate()?)
            } else {
                Box::new(DialogChooser::default())
            };
            let opts = PickOptions { prefix, exec, args };
            cmd_pick(&resolve, &opts, &sources, chooser.as_ref(), &mut out)
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "tftarget", &mut out);
            Ok(())
        }
    }
}

/// Resolve addresses with the strategy the flags ask for.
///
/// Diagnostics are logged; an empty result is an error.
pub fn collect_addresses(resolve: &ResolveArgs, sources: &Sources) -> Result<Vec<Address>> {
    let opts = resolve.options();
    if let Some(message) = depth_warning(resolve) {
        tracing::warn!("{}", message);
    }

    let addresses = if resolve.state {
        state::state_addresses(sources.inventory, &opts.root, opts.max_depth)?
    } else {
        let mut diagnostics = Vec::new();
        let manifest = manifest::load_or_empty(&opts.root, opts.strict_manifest, &mut diagnostics)?;
        let resolution =
            resolver::resolve_manifest(sources.loader, &opts.root, &manifest, opts.max_depth);
        diagnostics.extend(resolution.diagnostics);
        report(&diagnostics);
        resolution.addresses
    };

    if addresses.is_empty() {
        return Err(Error::NoAddresses { root: opts.root });
    }
    Ok(addresses)
}

/// Flag combinations that cannot list anything.
fn depth_warning(resolve: &ResolveArgs) -> Option<&'static str> {
    (resolve.state && resolve.depth == 0)
        .then_some("--state with depth 0 lists nothing; root-level addresses need -d 1")
}

/// Log diagnostics to stderr through tracing.
fn report(diagnostics: &[Diagnostic]) {
    for d in diagnostics {
        match d.severity {
            Severity::Warning => tracing::warn!("{}", d),
            Severity::Error => tracing::error!("{}", d),
        }
    }
}

fn cmd_list(
    resolve: &ResolveArgs,
    prefix: &str,
    sources: &Sources,
    out: &mut impl Write,
) -> Result<()> {
    let addresses = collect_addresses(resolve, sources)?;
    for address in &addresses {
        writeln!(out, "{}{}", prefix, address)?;
    }
    Ok(())
}

fn cmd_pick(
    resolve: &ResolveArgs,
    opts: &PickOptions,
    sources: &Sources,
    chooser: &dyn Chooser,
    out: &mut impl Write,
) -> Result<()> {
    let bin = match opts.exec {
        Some(ref cmd) => Some(find_in_path(cmd).ok_or_else(|| Error::CommandNotFound {
            program: cmd.clone(),
        })?),
        None => None,
    };

    let addresses = collect_addresses(resolve, sources)?;
    let names = selection::with_sentinel(&addresses);

    let picked = chooser.choose(&names)?.ok_or(Error::NothingSelected)?;
    let targets = selection::apply_selection(&picked, &opts.prefix);

    let (Some(cmd), Some(bin)) = (opts.exec.as_deref(), bin) else {
        writeln!(out, "{}", targets.join(" "))?;
        return Ok(());
    };

    let argv = selection::exec_args(cmd, &opts.args, &targets);
    writeln!(out, "> {}", argv.join(" "))?;
    out.flush()?;
    Err(local::exec(&bin, &argv))
}
