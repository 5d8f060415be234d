/// Strategy for listing stored keywords, newest first.
#[derive(Debug, Clone, Copy)]
pub struct ListStrategy;

impl super::CommandStrategy for ListStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let mut desk = super::open_desk().await?;

        let result = desk.refresh().await.map(|_| ());
        if let Err(e) = result {
            let message = desk.error().unwrap_or("Failed to load keywords.");
            anyhow::bail!("{message} ({e})");
        }

        super::print_keywords(desk.keywords());
        Ok(())
    }
}
