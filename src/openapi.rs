use utoipa::OpenApi;

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(title = "Warung Sekre POS terminal"),
    paths(
        handlers::session::get_session,
        handlers::catalog::list_products,
        handlers::cart::get_cart,
        handlers::cart::add_item,
        handlers::cart::change_quantity,
        handlers::cart::remove_item,
        handlers::cart::clear_cart,
        handlers::cart::set_tender,
        handlers::cart::validate_tender,
        handlers::checkout::finalize,
        handlers::checkout::acknowledge,
        handlers::reports::list_transactions,
        handlers::reports::sales_summary,
    ),
    tags(
        (name = "cart", description = "Cart and tender of the current transaction"),
        (name = "checkout", description = "Order finalization"),
        (name = "catalog", description = "Products from the backend"),
        (name = "reports", description = "History and sales"),
        (name = "session", description = "Terminal operator"),
    )
)]
pub struct ApiDoc;
