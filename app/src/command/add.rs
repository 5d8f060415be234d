use harbor_core::Category;

/// Input for the add command.
#[derive(Debug, Clone)]
pub struct AddInput {
    pub term: String,
    pub category: Category,
}

/// Strategy for manually adding one keyword.
///
/// The term is normalized and rejected if it is already stored.
#[derive(Debug, Clone, Copy)]
pub struct AddStrategy;

impl super::CommandStrategy for AddStrategy {
    type Input = AddInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let mut desk = super::open_desk().await?;
        super::prime_local_listing(&mut desk).await;

        match desk.add_keyword(&input.term, input.category).await {
            Ok(keyword) => {
                println!(
                    "Added \"{}\" to {} (id {})",
                    keyword.term,
                    keyword.category.label(),
                    keyword.id
                );
                Ok(())
            }
            Err(e) => {
                let message = desk.error().map_or_else(|| e.to_string(), str::to_string);
                anyhow::bail!(message)
            }
        }
    }
}
