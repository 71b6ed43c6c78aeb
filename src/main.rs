//! # probe-expander
//!
//! Expands morphological probing datasets with examples extracted from
//! Universal Dependencies treebanks.
//!
//! ## Getting started
//!
//! ```sh
//! probe-expander 0.1.0
//! probing dataset expansion tool.
//!
//! USAGE:
//!     probe-expander <SUBCOMMAND>
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!     -V, --version    Prints version information
//!
//! SUBCOMMANDS:
//!     generate    Generate the expanded datasets
//!     help        Prints this message or the help of the given subcommand(s)
//!     models      Pair test datasets with their trained models
//! ```
//!
use probe_expander::error::Error;
use probe_expander::filtering::MatchRate;
use probe_expander::io::writer::EmitMode;
use probe_expander::models::{self, ModelIndex, ProbingConfig};
use probe_expander::pipeline::{Expand, Pipeline};
use structopt::StructOpt;

#[macro_use]
extern crate log;

mod cli;

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = cli::ProbeExpander::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        cli::ProbeExpander::Generate(g) => {
            let mode = if g.random {
                EmitMode::Randomized
            } else {
                EmitMode::Expanded
            };
            let dst = g.dst();
            let p = Expand::new(g.probes, g.treebanks, dst, g.tags, mode)
                .with_filter(MatchRate::with_min_rate(g.threshold))
                .with_seed(g.seed);
            let summary = p.run()?;

            for language in &summary.failed_languages {
                error!("[{}] expansion failed, see previous messages", language);
            }
        }

        cli::ProbeExpander::Models(m) => {
            let config = ProbingConfig::from_path(&m.config)?;
            let index = ModelIndex::build(&config.experiment_dir, &m.tags)?;
            let targets = models::plan_inference(&m.data, &m.tags, &index, m.posthoc)?;

            info!("{} datasets paired with a model", targets.len());
            for target in targets {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    target.group.id.language,
                    target.group.id.feature,
                    target.group.id.pos,
                    target.model_name.as_deref().unwrap_or("_"),
                    target.model_dir.display(),
                    target.test_file.display()
                );
            }
        }
    };
    Ok(())
}
