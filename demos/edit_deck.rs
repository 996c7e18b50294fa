use std::env;

use serde_json::json;
use smartslide_editor::{
    cache::NavigationState,
    editor::Command,
    logging::init_logging,
    markdown::deck_to_markdown,
    models::{textbox::StyleFlag, TemplateDescriptor, TextKind, ZOrderCommand},
    EditorConfig, EditorSession, MemoryCache, PresentationClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = EditorConfig::from_env()?;
    let navigation = NavigationState {
        slides: json!([
            { "title": "Q3 Review", "content": "Revenue up\nCosts flat" },
            {
                "title": "Highlights",
                "content": ["New region launched", "", "Two key hires"],
                "image_url": "https://example.com/chart.png"
            }
        ]),
        from_editor: false,
    };
    let template = TemplateDescriptor::new("modern-gradient");
    let (mut session, source) =
        EditorSession::open(Some(&navigation), MemoryCache::new(), config.clone(), Some(template));
    log::info!("Deck loaded from {:?}", source);

    let title = session
        .editor()
        .current_slide()
        .first_of_kind(TextKind::Title)
        .map(|t| t.id.clone())
        .ok_or_else(|| anyhow::anyhow!("first slide has no title box"))?;

    let commands = vec![
        Command::EditText {
            id: title.clone(),
            text: "Q3 Results".to_string(),
        },
        Command::ToggleStyle {
            id: title,
            flag: StyleFlag::Italic,
            range: None,
        },
        Command::SelectSlide { index: 1 },
        Command::AddImages {
            sources: vec!["data:image/png;base64,iVBORw0KGgo=".to_string()],
        },
    ];
    for command in commands {
        let outcome = session.apply(command);
        log::info!("{:?}", outcome);
    }

    if let Some(image) = session.editor().current_slide().images.last() {
        let id = image.id.clone();
        session.apply(Command::SetImageZOrder {
            id,
            order: ZOrderCommand::ToBack,
        });
    }

    println!("{}", deck_to_markdown(session.editor().deck(), Some("Quarterly review")));
    println!("Layout of slide 2: {:?}", session.editor().resolve_layout(1)?);

    if env::args().any(|a| a == "--save") {
        let client = PresentationClient::new(reqwest::Client::new(), &config);
        match session.save(&client).await {
            Ok(id) => println!("Saved presentation {}", id),
            Err(e) => eprintln!("{}", e.user_message()),
        }
        if let Some(summary) = session.unsaved_summary() {
            println!("{}", summary);
        }
    }

    Ok(())
}
