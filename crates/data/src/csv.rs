//! Training sets as comma separated text.
//!
//! One row per line, features first, integer label in the last column. A
//! first line whose leading field is not numeric is taken as a header.
use mlh_core::Feature;
use mlh_core::Label;
use mlh_models::ModelError;
use mlh_models::TrainingSet;

pub fn parse(text: &str) -> Result<TrainingSet, ModelError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .peekable();
    if let Some((_, first)) = lines.peek() {
        if is_header(first) {
            lines.next();
        }
    }
    let (x, y) = lines
        .map(|(n, line)| record(n, line))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .unzip::<_, _, Vec<Vec<Feature>>, Vec<Label>>();
    TrainingSet::new(x, y)
}

pub fn render(set: &TrainingSet) -> String {
    let width = set.width();
    let header = (0..width)
        .map(|j| format!("x{}", j))
        .chain(std::iter::once("y".to_string()))
        .collect::<Vec<_>>()
        .join(",");
    set.x()
        .iter()
        .zip(set.y())
        .map(|(row, label)| {
            row.iter()
                .map(|v| v.to_string())
                .chain(std::iter::once(label.to_string()))
                .collect::<Vec<_>>()
                .join(",")
        })
        .fold(header + "\n", |text, line| text + &line + "\n")
}

fn is_header(line: &str) -> bool {
    line.split(',')
        .next()
        .map(|field| field.trim().parse::<Feature>().is_err())
        .unwrap_or(false)
}

fn record(n: usize, line: &str) -> Result<(Vec<Feature>, Label), ModelError> {
    let fields = line.split(',').map(str::trim).collect::<Vec<_>>();
    let (label, features) = fields
        .split_last()
        .filter(|(_, features)| !features.is_empty())
        .ok_or_else(|| ModelError::Dataset(format!("line {}: need features and a label", n)))?;
    let label = label
        .parse::<Label>()
        .ok()
        .or_else(|| label.parse::<f64>().ok().and_then(mlh_core::integral))
        .ok_or_else(|| {
            ModelError::Dataset(format!("line {}: label {:?} is not an integer", n, label))
        })?;
    let features = features
        .iter()
        .map(|field| {
            field.parse::<Feature>().map_err(|_| {
                ModelError::Dataset(format!("line {}: {:?} is not a number", n, field))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((features, label))
}
