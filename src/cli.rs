//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use probe_expander::tags::TagSpec;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "probe-expander", about = "probing dataset expansion tool.")]
/// Holds every command that is callable by the `probe-expander` command.
pub enum ProbeExpander {
    #[structopt(about = "Generate the expanded datasets")]
    Generate(Generate),
    #[structopt(about = "Pair test datasets with their trained models")]
    Models(Models),
}

#[derive(Debug, StructOpt)]
/// Generate command and parameters.
///
/// ```sh
/// probe-expander-generate 0.1.0
/// Generate the expanded datasets
///
/// USAGE:
///     probe-expander generate [FLAGS] [OPTIONS]
///
/// FLAGS:
///     -h, --help       Prints help information
///     -r, --random     generate randomized control datasets
///
/// OPTIONS:
///     -t, --tags <tags>              tags of the datasets to expand [default: all,all]
///         --probes <probes>          probe datasets location [default: morphology_probes/data]
///         --treebanks <treebanks>    UD treebanks location [default: ud-treebanks-v2.12]
///         --dst <dst>                destination of the generated datasets
///         --threshold <threshold>    minimum match rate (%) to keep a split [default: 5]
///         --seed <seed>              seed of the randomized datasets
/// ```
pub struct Generate {
    #[structopt(
        short = "t",
        long = "tags",
        help = "tags of the datasets to expand. Format: <language,feature_pos>[|<language,feature_pos>]*, eg. English,number_noun",
        default_value = "all,all"
    )]
    pub tags: TagSpec,
    #[structopt(short = "r", long = "random", help = "generate randomized control datasets")]
    pub random: bool,
    #[structopt(
        parse(from_os_str),
        long = "probes",
        help = "probe datasets location",
        default_value = "morphology_probes/data"
    )]
    pub probes: PathBuf,
    #[structopt(
        parse(from_os_str),
        long = "treebanks",
        help = "UD treebanks location",
        default_value = "ud-treebanks-v2.12"
    )]
    pub treebanks: PathBuf,
    #[structopt(
        parse(from_os_str),
        long = "dst",
        help = "destination of the generated datasets. Default is datasets/dep_tree, or datasets/random with --random"
    )]
    pub dst: Option<PathBuf>,
    #[structopt(
        long = "threshold",
        help = "minimum match rate (%) to keep a split",
        default_value = "5"
    )]
    pub threshold: f64,
    #[structopt(long = "seed", help = "seed of the randomized datasets")]
    pub seed: Option<u64>,
}

impl Generate {
    pub fn dst(&self) -> PathBuf {
        match (&self.dst, self.random) {
            (Some(dst), _) => dst.clone(),
            (None, false) => PathBuf::from("datasets/dep_tree"),
            (None, true) => PathBuf::from("datasets/random"),
        }
    }
}

#[derive(Debug, StructOpt)]
/// Models command and parameters.
pub struct Models {
    #[structopt(
        parse(from_os_str),
        long = "config",
        help = "probing configuration file, holding the experiment directory"
    )]
    pub config: PathBuf,
    #[structopt(
        parse(from_os_str),
        long = "data",
        help = "datasets location",
        default_value = "morphology_probes/data"
    )]
    pub data: PathBuf,
    #[structopt(
        short = "t",
        long = "tags",
        help = "tags of the datasets",
        default_value = "all,all"
    )]
    pub tags: TagSpec,
    #[structopt(long = "posthoc", help = "use posthoc.tsv instead of test.tsv")]
    pub posthoc: bool,
}
