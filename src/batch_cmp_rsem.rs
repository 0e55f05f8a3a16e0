extern crate clap;
extern crate rsem_batch;

use std::io::Write;

use clap::{Arg, ArgAction, Command};

use rsem_batch::batch_cmp::{CLI, FATAL_EXIT};
use rsem_batch::compare::{Tool, DEFAULT_TOOL};

fn main() {
    let matches = Command::new("batch-cmp-rsem")
        .version("1.0")
        .author("Nick Ingolia <ingolia@berkeley.edu>")
        .about("Calls cmp_two_rsem_results_files.py in batch with the --plot option set")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("MANIFEST.TXT")
                .help(
                    "Tab-delimited file of sample RSEM results, control RSEM results, \
                     and gene/isoform id or name. First line is a header starting with '#'; \
                     later lines starting with '#' are skipped",
                )
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("OUTDIR")
                .help("Output directory, created if missing (parent directories are not)")
                .required(true),
        )
        .arg(
            Arg::new("continue_on")
                .short('c')
                .long("continue-on")
                .help("Skip rows whose sample or control file doesn't exist, with a message on stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("by_name")
                .long("by-name")
                .help("Column 3 holds gene or transcript names rather than IDs")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("tool")
                .short('t')
                .long("tool")
                .value_name("COMMAND")
                .help(
                    "Comparison tool command, split on whitespace into a program and \
                     leading arguments (so the program path cannot contain spaces)",
                )
                .default_value(DEFAULT_TOOL),
        )
        .arg(
            Arg::new("summary")
                .long("summary")
                .value_name("SUMMARY.TXT")
                .help("Tab-delimited table of per-row outcomes"),
        )
        .arg(
            Arg::new("fail_on_error")
                .long("fail-on-error")
                .help("Exit with status 1 if any row failed or was malformed")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let tool = match Tool::parse(matches.get_one::<String>("tool").unwrap()) {
        Ok(tool) => tool,
        Err(err) => exit_with(err),
    };

    let cli = CLI {
        input: matches.get_one::<String>("input").unwrap().to_string(),
        output_dir: matches.get_one::<String>("output").unwrap().to_string(),
        continue_on: matches.get_flag("continue_on"),
        by_name: matches.get_flag("by_name"),
        tool,
        summary: matches.get_one::<String>("summary").cloned(),
    };

    match cli.run() {
        Ok(summary) => {
            eprintln!("{}", summary);
            std::process::exit(summary.exit_status(matches.get_flag("fail_on_error")));
        }
        Err(err) => exit_with(err),
    }
}

fn exit_with(err: anyhow::Error) -> ! {
    std::io::stderr()
        .write_all(format!("{:?}\n", err).as_bytes())
        .unwrap();
    std::process::exit(FATAL_EXIT);
}
