use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = finrag_api::Args::parse();

	finrag_api::run(args).await
}
