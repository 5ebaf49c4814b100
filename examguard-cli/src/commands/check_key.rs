use anyhow::{Context, Result};
use clap::Args;
use examguard_core::{KeyPress, ShortcutCategory, events::blocked_shortcut};
use serde::Serialize;

#[derive(Args)]
pub struct CheckKeyArgs {
    /// Key combination, e.g. `Ctrl+Shift+I` or `Alt+F4`
    pub combo: String,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct KeyCheck {
    key: String,
    suppressed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<ShortcutCategory>,
}

impl KeyCheck {
    fn new(key: &KeyPress) -> Self {
        let category = blocked_shortcut(key);
        Self {
            key: key.to_string(),
            suppressed: category.is_some(),
            category,
        }
    }

    fn describe(&self) -> String {
        match self.category {
            Some(category) => format!("{}: suppressed while locked ({category})", self.key),
            None => format!("{}: allowed", self.key),
        }
    }
}

pub fn run(args: CheckKeyArgs) -> Result<()> {
    let key: KeyPress = args
        .combo
        .parse()
        .with_context(|| format!("Invalid key combination '{}'", args.combo))?;
    let check = KeyCheck::new(&key);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&check)?);
    } else {
        println!("{}", check.describe());
    }
    Ok(())
}
