extern crate argh;
extern crate btm_infer;
extern crate env_logger;
#[macro_use]
extern crate log;

use argh::FromArgs;
use std::process;

use btm_infer::{InferConfigBuilder, InferError, OutputMode, Strategy};

#[derive(FromArgs)]
/// Infer topic proportions p(z|d) of tokenized documents under a trained biterm topic model.
struct Args {
    /// number of topics
    #[argh(option, short = 'k')]
    k: usize,

    /// inference strategy: sum_b, sum_w or mix
    #[argh(option, default = "String::from(\"sum_b\")")]
    strategy: String,

    /// output mode: max_idx or prob
    #[argh(option, default = "String::from(\"prob\")")]
    output: String,

    /// output file is <model_dir>/k<K><suffix>
    #[argh(option, default = "String::from(\".pz_d\")")]
    suffix: String,

    /// training iteration of the model checkpoint to load
    #[argh(option)]
    iteration: Option<usize>,

    /// documents, one line of word indices each
    #[argh(positional)]
    docs: String,

    /// directory holding k<K>.pz and k<K>.pw_z
    #[argh(positional)]
    model_dir: String,
}

fn try_main(args: Args) -> Result<(), InferError> {
    let strategy = Strategy::from_name(&args.strategy)?;
    let output = OutputMode::from_name(&args.output)?;

    let config = InferConfigBuilder::new(&args.docs, &args.model_dir, args.k)
        .strategy(strategy)
        .output(output)
        .suffix(&args.suffix)
        .iteration(args.iteration)
        .build()?;

    let out_path = btm_infer::run(&config)?;
    println!("{}", out_path.display());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();
    if let Err(err) = try_main(args) {
        error!("{}", err);
        process::exit(1);
    }
}
