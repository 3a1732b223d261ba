use std::fs::{create_dir_all, read_to_string, write};

use clap_complete::{generate_to, Shell};

include!("src/parser.rs");

fn main() {
    println!("cargo:rerun-if-changed=src/parser.rs");

    if std::env::var("DOCS_RS").is_ok() {
        return; // only build when we're not generating docs
    }

    let outdir = "shell_completions";

    create_dir_all(outdir).expect("Couldn't create shell_completions directory");

    let mut app = initialize();

    let shells: [Shell; 4] = [Shell::Bash, Shell::Fish, Shell::Zsh, Shell::PowerShell];

    for shell in shells {
        generate_to(shell, &mut app, "linkscrape", outdir)
            .expect("Couldn't generate shell completion script");
    }

    // -f and -o take file paths; without plusdirs, bash won't complete directories along the way
    let bash_file = format!("{}/linkscrape.bash", outdir);

    let contents = read_to_string(&bash_file).expect("Couldn't read bash completion script");

    let contents = contents.replace("default linkscrape", "default -o plusdirs linkscrape");

    write(&bash_file, contents).expect("Couldn't write updated bash completion script to disk");
}
