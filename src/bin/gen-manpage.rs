//! Writes `fram.1` plus one `fram-<command>.1` page per subcommand
//!
//! Usage: gen-manpage [output-dir]  (default: ./man)

use clap::CommandFactory;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[path = "../cli.rs"]
#[allow(dead_code)]
mod cli;

fn write_page(dir: &Path, name: &str, cmd: clap::Command) -> io::Result<PathBuf> {
    let mut page = Vec::new();
    clap_mangen::Man::new(cmd).title(name).render(&mut page)?;
    let path = dir.join(format!("{}.1", name));
    fs::write(&path, page)?;
    Ok(path)
}

fn main() -> io::Result<()> {
    let dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("man"));
    fs::create_dir_all(&dir)?;

    let mut cmd = cli::Cli::command();
    cmd.build();

    let mut written = vec![write_page(&dir, "fram", cmd.clone())?];
    for sub in cmd.get_subcommands() {
        let name = format!("fram-{}", sub.get_name());
        written.push(write_page(&dir, &name, sub.clone())?);
    }

    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}
