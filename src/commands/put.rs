use std::path::Path;

use anyhow::Context;
use tokio::io::AsyncReadExt;
use tokio::{fs, io};

use crate::controllers::paste;
use crate::App;

pub async fn run(mut app: App, lang: &str, file: Option<&Path>) -> anyhow::Result<()> {
    let code = match file {
        Some(path) => fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut code = String::new();
            io::stdin()
                .read_to_string(&mut code)
                .await
                .context("failed to read stdin")?;
            code
        }
    };

    let record = paste::create(&mut app, &code, lang)
        .await
        .context("upload failed")?;

    println!("{}", app.config.paste_url(&record.id));
    Ok(())
}
