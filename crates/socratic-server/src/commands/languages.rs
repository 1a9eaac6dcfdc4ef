//! The `socratic languages` command.

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};

use socratic_core::model::{DEFAULT_LANGUAGE, LANGUAGES};

pub fn execute() -> Result<()> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Language", "Code", ""]);

    for lang in LANGUAGES {
        let marker = if lang.name == DEFAULT_LANGUAGE {
            "default"
        } else {
            ""
        };
        table.add_row(vec![lang.name, lang.code, marker]);
    }

    println!("{table}");
    Ok(())
}
