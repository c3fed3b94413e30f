#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    certificate_bot::run().await
}
