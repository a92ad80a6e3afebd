use anyhow::Result;
use coursegen::generate_course_outline;
use extract::Extractor;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("Usage: generate <course title> <unit> [<unit> ...]");
        std::process::exit(1);
    }

    let title = &args[0];
    let units = &args[1..];

    let extractor = Extractor::from_env()?;

    let outline = generate_course_outline(&extractor, title, units).await;
    println!("{}", serde_json::to_string_pretty(&outline)?);

    Ok(())
}
