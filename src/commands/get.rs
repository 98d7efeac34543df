use crate::controllers::paste;
use crate::types::api::PasteView;
use crate::App;

pub async fn run(mut app: App, id: &str, raw: bool) -> anyhow::Result<()> {
    let record = paste::retrieve(&mut app, id).await?;

    if raw {
        print!("{}", record.code);
    } else {
        println!("{}", serde_json::to_string_pretty(&PasteView::from(record))?);
    }

    Ok(())
}
