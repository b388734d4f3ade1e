use super::*;
use mlh_auth::Auth;
use mlh_models::TrainingSet;

type Reply = Result<HttpResponse, HubError>;

pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "mlhub model service. POST /token for a bearer token."
    }))
}

pub async fn health(hub: web::Data<Hub>) -> HttpResponse {
    match hub
        .health()
        .await
        .inspect_err(|e| log::error!("health check failed: {}", e))
    {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "status": "healthy" })),
        Err(_) => {
            HttpResponse::ServiceUnavailable().json(serde_json::json!({ "status": "unavailable" }))
        }
    }
}

pub async fn available(_: Auth, hub: web::Data<Hub>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "available_models": hub.available() }))
}

pub async fn stored(_: Auth, hub: web::Data<Hub>) -> Reply {
    let names = hub.stored().await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "stored_models": names })))
}

pub async fn describe(_: Auth, hub: web::Data<Hub>, id: web::Path<String>) -> Reply {
    Ok(HttpResponse::Ok().json(hub.describe(&id).await?))
}

pub async fn train(auth: Auth, hub: web::Data<Hub>, req: web::Json<TrainRequest>) -> Reply {
    let TrainRequest {
        model_type,
        params,
        data,
        dataset,
    } = req.into_inner();
    let model_type = model_type.ok_or(HubError::Missing("model_type"))?;
    log::info!("{} training {} with {:?}", auth.subject(), model_type, params);
    let input = Input::from_request(data, dataset)?;
    let meta = hub.train(&model_type, input, params).await?;
    Ok(HttpResponse::Ok().json(TrainResponse {
        model_id: meta.name,
        status: "trained".to_string(),
    }))
}

pub async fn predict(
    _: Auth,
    hub: web::Data<Hub>,
    id: web::Path<String>,
    req: web::Json<PredictRequest>,
) -> Reply {
    log::info!("predicting with {}", id);
    let prediction = hub.predict(&id, req.into_inner().features.into()).await?;
    Ok(HttpResponse::Ok().json(PredictResponse { prediction }))
}

pub async fn retrain(
    auth: Auth,
    hub: web::Data<Hub>,
    id: web::Path<String>,
    req: web::Json<TrainRequest>,
) -> Reply {
    let TrainRequest {
        params,
        data,
        dataset,
        ..
    } = req.into_inner();
    log::info!("{} retraining {}", auth.subject(), id);
    let input = Input::from_request(data, dataset)?;
    hub.retrain(&id, input, params).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "retrained" })))
}

pub async fn delete(auth: Auth, hub: web::Data<Hub>, id: web::Path<String>) -> Reply {
    log::info!("{} deleting {}", auth.subject(), id);
    hub.delete(&id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "deleted" })))
}

pub async fn import(
    _: Auth,
    hub: web::Data<Hub>,
    name: web::Path<String>,
    req: web::Json<Data>,
) -> Reply {
    let set = TrainingSet::try_from(req.into_inner())?;
    let rows = hub.import(&name, set).await?;
    Ok(HttpResponse::Ok().json(DatasetResponse {
        dataset: name.into_inner(),
        rows,
        status: "saved".to_string(),
    }))
}
