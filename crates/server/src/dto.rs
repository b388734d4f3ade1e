use mlh_core::Feature;
use mlh_core::Label;
use mlh_models::ModelError;
use mlh_models::Params;
use mlh_models::TrainingSet;
use serde::Deserialize;
use serde::Serialize;

/// Inline training data, `X` rows and `y` labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Data {
    #[serde(rename = "X")]
    pub x: Vec<Vec<Feature>>,
    #[serde(deserialize_with = "labels")]
    pub y: Vec<Label>,
}

/// Labels as integers or whole-number floats, the same rule CSV datasets follow.
fn labels<'de, D>(deserializer: D) -> Result<Vec<Label>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Integer(Label),
        Float(f64),
    }

    Vec::<Scalar>::deserialize(deserializer)?
        .into_iter()
        .map(|scalar| match scalar {
            Scalar::Integer(label) => Ok(label),
            Scalar::Float(f) => mlh_core::integral(f).ok_or_else(|| {
                serde::de::Error::custom(format!("label {} is not an integer", f))
            }),
        })
        .collect()
}

impl TryFrom<Data> for TrainingSet {
    type Error = ModelError;
    fn try_from(data: Data) -> Result<Self, Self::Error> {
        TrainingSet::new(data.x, data.y)
    }
}

/// Body of `/train/` and `/retrain/{id}`. Either `data` or `dataset`
/// supplies the rows; `model_type` is ignored on retrain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainRequest {
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub data: Option<Data>,
    #[serde(default)]
    pub dataset: Option<String>,
}

/// One row, or several.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Features {
    Row(Vec<Feature>),
    Rows(Vec<Vec<Feature>>),
}

impl From<Features> for Vec<Vec<Feature>> {
    fn from(features: Features) -> Self {
        match features {
            Features::Row(row) => vec![row],
            Features::Rows(rows) => rows,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub features: Features,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainResponse {
    pub model_id: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: Vec<Label>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetResponse {
    pub dataset: String,
    pub rows: usize,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn train_request_accepts_inline_data() {
        let json = r#"{"model_type":"forest","params":{"n_estimators":10,"max_depth":3},
            "data":{"X":[[5.1,3.5,1.4,0.2],[7.0,3.2,4.7,1.4]],"y":[0,1]}}"#;
        let req = serde_json::from_str::<TrainRequest>(json).unwrap();
        assert_eq!(req.model_type.as_deref(), Some("forest"));
        assert_eq!(req.params.integer("max_depth"), Ok(Some(3)));
        let set = TrainingSet::try_from(req.data.unwrap()).unwrap();
        assert_eq!(set.rows(), 2);
    }

    #[test]
    fn train_request_fields_are_optional() {
        let req = serde_json::from_str::<TrainRequest>(r#"{"dataset":"iris"}"#).unwrap();
        assert!(req.model_type.is_none());
        assert!(req.params.is_empty());
        assert_eq!(req.dataset.as_deref(), Some("iris"));
    }

    #[test]
    fn features_take_one_row_or_many() {
        let one = serde_json::from_str::<PredictRequest>(r#"{"features":[5.5,3.0]}"#).unwrap();
        let many =
            serde_json::from_str::<PredictRequest>(r#"{"features":[[5.5,3.0],[1,2]]}"#).unwrap();
        assert_eq!(Vec::<Vec<f64>>::from(one.features).len(), 1);
        assert_eq!(Vec::<Vec<f64>>::from(many.features).len(), 2);
    }

    #[test]
    fn labels_may_be_whole_floats() {
        let data = serde_json::from_str::<Data>(r#"{"X":[[1],[2],[3]],"y":[0.0,1,2.0]}"#).unwrap();
        assert_eq!(data.y, vec![0, 1, 2]);
        assert!(serde_json::from_str::<Data>(r#"{"X":[[1]],"y":[0.5]}"#).is_err());
        assert!(serde_json::from_str::<Data>(r#"{"X":[[1]],"y":["a"]}"#).is_err());
    }
}
