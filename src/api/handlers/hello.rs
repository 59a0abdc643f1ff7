/*
 * Responsibility
 * - GET /api/hello (public, 疎通用)
 */
pub async fn hello() -> &'static str {
    "hello"
}
