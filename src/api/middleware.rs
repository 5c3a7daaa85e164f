use actix_web::{body::MessageBody, dev::{ServiceRequest, ServiceResponse}, middleware::Next, Error};
use tracing::debug;

/**
 * Middleware logging method, path, status and duration of every request.
 */
pub async fn timing_middleware(
    request: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let start_time = std::time::Instant::now();
    let path = request.path().to_owned();
    let method = request.method().to_owned();
    let response = next.call(request).await;
    let status = match &response {
        Ok(service_response) => service_response.status().as_u16(),
        // Errors that escape the handlers are rendered as internal server errors
        Err(_) => 500,
    };
    debug!(target: "performance", %method, %path, status, elapsed_ms = start_time.elapsed().as_millis(), "Request processed");
    response
}
