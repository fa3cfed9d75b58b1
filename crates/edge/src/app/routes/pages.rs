//! HTML shell for every page route. The wasm bundle mounts into `<body>` and
//! takes over routing from there.

use axum::{http::Uri, response::Html};

use astexo_auth::{RouteClass, classify};

pub async fn shell(uri: Uri) -> Html<String> {
    let title = match classify(uri.path()) {
        RouteClass::Public => "Astexo",
        RouteClass::AdminProtected => "Astexo | Admin",
        RouteClass::ClientProtected => "Astexo | Client",
    };

    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <script type=\"module\">import init from '/pkg/astexo_client.js'; init();</script>\n\
         </head>\n<body></body>\n</html>\n"
    ))
}
