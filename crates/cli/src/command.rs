use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "mlhub",
    author,
    version,
    about = "Train, store and query classifiers",
    long_about = None
)]
pub enum Command {
    #[command(about = "List trainable model types")]
    Models,
    #[command(about = "List stored models", alias = "ls")]
    Stored,
    #[command(about = "Train a model on a catalog dataset and store it")]
    Train {
        #[arg(long, short)]
        model: String,
        #[arg(long, short)]
        dataset: String,
        /// Hyperparameter as key=value, repeatable
        #[arg(long = "param", short, value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
    #[command(about = "Retrain a stored model on a catalog dataset")]
    Retrain {
        #[arg(long, short)]
        model: String,
        #[arg(long, short)]
        dataset: String,
        #[arg(long = "param", short, value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
    #[command(about = "Predict the label of one feature row")]
    Predict {
        #[arg(long, short)]
        model: String,
        /// Comma separated feature values
        #[arg(long, short, value_delimiter = ',', allow_negative_numbers = true, required = true)]
        features: Vec<f64>,
    },
    #[command(about = "Show stored model metadata", alias = "info")]
    Inspect {
        #[arg(long, short)]
        model: String,
    },
    #[command(about = "Delete a stored model", alias = "rm")]
    Delete {
        #[arg(long, short)]
        model: String,
    },
    #[command(about = "Copy a CSV file into the dataset catalog")]
    Import {
        #[arg(long, short)]
        dataset: String,
        #[arg(long, short)]
        file: std::path::PathBuf,
    },
    #[command(about = "List catalog datasets")]
    Datasets,
    #[command(about = "Hash a password for API_HASHWORD")]
    Hash {
        #[arg(required = true)]
        password: String,
    },
}
