use mfix::{file::MfiFile, smf};
use std::{
    env, fs,
    io::{BufWriter, Write},
    process::ExitCode,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let [input, output] = args.as_slice() else {
        eprintln!("Usage: mld2mid <file.mld> <file.mid>");
        return ExitCode::FAILURE;
    };

    match convert(input, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("mld2mid: {err}");
            ExitCode::FAILURE
        }
    }
}

fn convert(input: &str, output: &str) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = fs::read(input)?;
    let file = MfiFile::parse(&bytes)?;
    info!(
        tracks = file.song().tracks().len(),
        note_mode = ?file.note_mode(),
        "decoded {input}"
    );

    let mut out = BufWriter::new(fs::File::create(output)?);
    smf::write_midi(file.song(), &mut out)?;
    out.flush()?;
    Ok(())
}
