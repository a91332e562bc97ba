// [libs/domain/oauth-flow/src/html.rs]
//! La vista de exito es deliberadamente minima: nunca ecoa el codigo de
//! autorizacion ni ningun token, solo el identificador de tenant ya
//! verificado.

pub fn render_success(tenant_id: &str) -> String {
    let escaped = tenant_id
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;");

    format!(
        "<!DOCTYPE html><html><body><h1>Connected</h1><p>Account {escaped} is now linked.</p></body></html>"
    )
}
