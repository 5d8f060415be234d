/// Strategy for deleting a keyword by id.
///
/// Deleting an id that does not exist is not an error.
#[derive(Debug, Clone, Copy)]
pub struct DeleteStrategy;

impl super::CommandStrategy for DeleteStrategy {
    type Input = i64;

    async fn execute(&self, id: Self::Input) -> anyhow::Result<()> {
        let mut desk = super::open_desk().await?;

        if let Err(e) = desk.delete_keyword(id).await {
            let message = desk.error().unwrap_or("Failed to delete keyword.");
            anyhow::bail!("{message} ({e})");
        }

        println!("Deleted keyword {id}");
        Ok(())
    }
}
