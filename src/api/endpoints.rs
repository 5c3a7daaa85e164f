use actix_web::{
    HttpRequest, HttpResponse, delete, get, post, put,
    web::{self, Path},
};
use tracing::{Instrument, instrument};

use crate::{
    api::{
        rest::{ApiResponse, IndexResponse, ProductAddRequest, ProductResponse, ProductUpdateRequest, SupplierAddUpdateRequest, SupplierResponse},
        state::AppState,
    },
    model::{
        apperror::{ApplicationError, ErrorType},
        models::{ProductAddInputType, ProductUpdateInputType, SupplierAddUpdateInputType},
    },
};

/**
 * Registers all endpoints together with the extractor configuration.
 */
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(index)
        .service(supplier_add)
        .service(supplier_list)
        .service(supplier_get)
        .service(supplier_update)
        .service(supplier_delete)
        .service(product_add)
        .service(product_list)
        .service(product_get)
        .service(product_update)
        .service(product_delete);
}

/**
 * Body that is not valid JSON or lacks a required field is a validation error.
 */
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _http_request| ApplicationError::new(ErrorType::Validation, format!("Invalid request body: {err}")).into())
}

/**
 * Ids in the path that are not integers are validation errors.
 */
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _http_request| ApplicationError::new(ErrorType::Validation, format!("Invalid path: {err}")).into())
}

/**
 * Information about the API.
 */
#[instrument(level = "info", skip(http_request), fields(service = "index", trace_id = get_trace_id(&http_request)))]
#[get("/")]
pub async fn index(http_request: HttpRequest) -> HttpResponse {
    HttpResponse::Ok().json(IndexResponse { msg: "Inventory API: manage /supplier and /product resources".to_string() })
}

/**
 * Add a new supplier.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "addSupplier", trace_id = get_trace_id(&http_request)))]
#[post("/supplier")]
pub async fn supplier_add(http_request: HttpRequest, request_body: web::Json<SupplierAddUpdateRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let supplier_input = SupplierAddUpdateInputType::from(request_body.into_inner());
    let supplier = app_state.supplier_service.add_supplier(supplier_input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(SupplierResponse::from(supplier))))
}

/**
 * Endpoint to retrieve all suppliers.
 */
#[instrument(skip(http_request, app_state), fields(service = "listSuppliers", trace_id = get_trace_id(&http_request)))]
#[get("/supplier")]
pub async fn supplier_list(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let suppliers = app_state.supplier_service.get_supplier_list().instrument(span).await?;
    let suppliers: Vec<SupplierResponse> = suppliers.into_iter().map(SupplierResponse::from).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(suppliers)))
}

/**
 * Endpoint to retrieve a supplier.
 */
#[instrument(skip(http_request, app_state), fields(service = "getSupplier", trace_id = get_trace_id(&http_request)))]
#[get("/supplier/{supplierId}")]
pub async fn supplier_get(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let supplier_id = path.into_inner();
    let supplier = app_state.supplier_service.get_supplier(supplier_id).instrument(span).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(SupplierResponse::from(supplier))))
}

/**
 * Endpoint to replace all fields of a supplier.
 */
#[instrument(skip(http_request, app_state), fields(service = "updateSupplier", trace_id = get_trace_id(&http_request)))]
#[put("/supplier/{supplierId}")]
pub async fn supplier_update(path: Path<i64>, http_request: HttpRequest, request_body: web::Json<SupplierAddUpdateRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let supplier_id = path.into_inner();
    let supplier_input = SupplierAddUpdateInputType::from(request_body.into_inner());
    let supplier = app_state.supplier_service.update_supplier(supplier_id, supplier_input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(SupplierResponse::from(supplier))))
}

/**
 * Endpoint to delete a supplier.
 */
#[instrument(skip(http_request, app_state), fields(service = "deleteSupplier", trace_id = get_trace_id(&http_request)))]
#[delete("/supplier/{supplierId}")]
pub async fn supplier_delete(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let supplier_id = path.into_inner();
    app_state.supplier_service.delete_supplier(supplier_id).instrument(span).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::acknowledged()))
}

/**
 * Add a new product supplied by the supplier in the path.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "addProduct", trace_id = get_trace_id(&http_request)))]
#[post("/product/{supplierId}")]
pub async fn product_add(path: Path<i64>, http_request: HttpRequest, request_body: web::Json<ProductAddRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let supplier_id = path.into_inner();
    let product_input = ProductAddInputType::from((request_body.into_inner(), supplier_id)).validate().map_err(|err| app_state.product_error(err))?;
    let product = app_state.product_service.add_product(product_input).instrument(span).await.map_err(|err| app_state.product_error(err))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(ProductResponse::from(product))))
}

/**
 * Endpoint to retrieve all products.
 */
#[instrument(skip(http_request, app_state), fields(service = "listProducts", trace_id = get_trace_id(&http_request)))]
#[get("/product")]
pub async fn product_list(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let products = app_state.product_service.get_product_list().instrument(span).await.map_err(|err| app_state.product_error(err))?;
    let products: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(products)))
}

/**
 * Endpoint to retrieve a product.
 */
#[instrument(skip(http_request, app_state), fields(service = "getProduct", trace_id = get_trace_id(&http_request)))]
#[get("/product/{productId}")]
pub async fn product_get(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let product_id = path.into_inner();
    let product = app_state.product_service.get_product(product_id).instrument(span).await.map_err(|err| app_state.product_error(err))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(ProductResponse::from(product))))
}

/**
 * Endpoint to record sales and restock a product.
 */
#[instrument(skip(http_request, app_state), fields(service = "updateProduct", trace_id = get_trace_id(&http_request)))]
#[put("/product/{productId}")]
pub async fn product_update(path: Path<i64>, http_request: HttpRequest, request_body: web::Json<ProductUpdateRequest>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let product_id = path.into_inner();
    let product_update_input = ProductUpdateInputType::from(request_body.into_inner()).validate().map_err(|err| app_state.product_error(err))?;
    let product = app_state.product_service.update_product(product_id, product_update_input).instrument(span).await.map_err(|err| app_state.product_error(err))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(ProductResponse::from(product))))
}

/**
 * Endpoint to delete a product. Deleting a missing product succeeds.
 */
#[instrument(skip(http_request, app_state), fields(service = "deleteProduct", trace_id = get_trace_id(&http_request)))]
#[delete("/product/{productId}")]
pub async fn product_delete(path: Path<i64>, http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let product_id = path.into_inner();
    app_state.product_service.delete_product(product_id).instrument(span).await.map_err(|err| app_state.product_error(err))?;
    Ok(HttpResponse::Ok().json(ApiResponse::acknowledged()))
}

/**
 * Retrieves the trace ID from the HTTP request headers.
 * If the trace ID is not present, a new UUID is generated.
 */
fn get_trace_id(http_request: &HttpRequest) -> String {
    http_request.headers().get("X-Trace-ID")
        .and_then(|v| v.to_str().ok().map(std::string::ToString::to_string))
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}
