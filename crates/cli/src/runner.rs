use super::*;
use anyhow::Context;
use clap::Parser;
use mlh_models::Params;
use mlh_server::Hub;
use mlh_server::Input;

/// Runs [`Command`]s against a hub built from the environment.
pub struct Cli(Hub);

impl From<Hub> for Cli {
    fn from(hub: Hub) -> Self {
        Self(hub)
    }
}

impl Cli {
    /// Parse process arguments, execute, print.
    pub async fn run() -> anyhow::Result<()> {
        let command = Command::parse();
        let cli = Self(Hub::from_env().await?);
        log::info!("using {} store", cli.0.store().kind());
        println!("{}", cli.execute(command).await?);
        Ok(())
    }

    pub async fn execute(&self, command: Command) -> anyhow::Result<String> {
        match command {
            Command::Models => Ok(self.0.available().join("\n")),
            Command::Stored => Ok(self.0.stored().await?.join("\n")),
            Command::Train {
                model,
                dataset,
                params,
            } => {
                let meta = self
                    .0
                    .train(&model, Input::Dataset(dataset), parse(&params)?)
                    .await?;
                Ok(format!(
                    "trained {} on {} rows (training accuracy {:.4}, revision {})",
                    meta.name, meta.rows, meta.accuracy, meta.revision
                ))
            }
            Command::Retrain {
                model,
                dataset,
                params,
            } => {
                let meta = self
                    .0
                    .retrain(&model, Input::Dataset(dataset), parse(&params)?)
                    .await?;
                Ok(format!(
                    "retrained {} as {} on {} rows (revision {})",
                    meta.name, meta.kind, meta.rows, meta.revision
                ))
            }
            Command::Predict { model, features } => {
                let labels = self.0.predict(&model, vec![features]).await?;
                Ok(labels
                    .iter()
                    .map(|label| label.to_string())
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            Command::Inspect { model } => {
                let meta = self.0.describe(&model).await?;
                Ok(serde_json::to_string_pretty(&meta)?)
            }
            Command::Delete { model } => {
                self.0.delete(&model).await?;
                log::info!("deleted {}", model);
                Ok(format!("deleted {}", model))
            }
            Command::Import { dataset, file } => {
                let text = std::fs::read_to_string(&file)
                    .with_context(|| format!("reading {}", file.display()))?;
                let set = mlh_data::csv::parse(&text)?;
                let rows = self.0.import(&dataset, set).await?;
                log::info!("imported {} rows as {} from {}", rows, dataset, file.display());
                Ok(format!("imported {} rows as {}", rows, dataset))
            }
            Command::Datasets => {
                let source = self
                    .0
                    .trainer()
                    .source()
                    .context("no dataset catalog configured")?;
                Ok(source.names()?.join("\n"))
            }
            Command::Hash { password } => {
                mlh_auth::password::hash(&password).map_err(|e| anyhow::anyhow!("{}", e))
            }
        }
    }
}

fn parse(pairs: &[String]) -> anyhow::Result<Params> {
    let mut params = Params::new();
    for pair in pairs {
        params.assign(pair)?;
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlh_data::Catalog;
    use mlh_models::Trainer;
    use mlh_store::Memory;
    use mlh_store::Store;
    use std::sync::Arc;

    fn cli(dir: &std::path::Path) -> Cli {
        let catalog = Catalog::new(dir.join("datasets"));
        Cli::from(Hub::new(
            Trainer::with_source(Arc::new(catalog)),
            Store::new(Memory::new()),
        ))
    }

    fn command(args: &[&str]) -> Command {
        Command::try_parse_from(std::iter::once("mlhub").chain(args.iter().copied())).unwrap()
    }

    #[tokio::test]
    async fn import_train_predict_delete() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("iris.csv");
        std::fs::write(
            &csv,
            "sl,sw,pl,pw,label\n\
             5.1,3.5,1.4,0.2,0\n\
             4.9,3.0,1.4,0.2,0\n\
             7.0,3.2,4.7,1.4,1\n\
             6.4,3.2,4.5,1.5,1\n",
        )
        .unwrap();
        let cli = cli(dir.path());
        let path = csv.to_str().unwrap();
        let out = cli.execute(command(&["import", "-d", "iris", "-f", path])).await.unwrap();
        assert_eq!(out, "imported 4 rows as iris");
        assert_eq!(cli.execute(command(&["datasets"])).await.unwrap(), "iris");
        let out = cli
            .execute(command(&["train", "-m", "forest", "-d", "iris", "-p", "n_estimators=10"]))
            .await
            .unwrap();
        assert!(out.starts_with("trained forest on 4 rows"));
        assert_eq!(cli.execute(command(&["stored"])).await.unwrap(), "forest");
        let out = cli
            .execute(command(&["predict", "-m", "forest", "-f", "5.5,3.0,1.5,0.3"]))
            .await
            .unwrap();
        assert!(out == "0" || out == "1");
        let out = cli.execute(command(&["inspect", "-m", "forest"])).await.unwrap();
        assert!(out.contains("\"n_estimators\": 10"));
        let out = cli.execute(command(&["delete", "-m", "forest"])).await.unwrap();
        assert_eq!(out, "deleted forest");
        assert!(cli.execute(command(&["delete", "-m", "forest"])).await.is_err());
    }

    #[tokio::test]
    async fn models_lists_registry() {
        let dir = tempfile::tempdir().unwrap();
        let out = cli(dir.path()).execute(Command::Models).await.unwrap();
        assert_eq!(out, "forest\nlogreg");
    }

    #[tokio::test]
    async fn bad_params_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = cli(dir.path())
            .execute(command(&["train", "-m", "forest", "-d", "iris", "-p", "oops"]))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn hash_verifies() {
        let dir = tempfile::tempdir().unwrap();
        let phc = cli(dir.path())
            .execute(command(&["hash", "hunter2"]))
            .await
            .unwrap();
        assert!(mlh_auth::password::verify("hunter2", &phc));
    }
}
