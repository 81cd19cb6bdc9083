/*!
 * Signed-in user extractor
 *
 * Responsibility:
 * - current_user middleware が入れた `ResolvedUser` を handler に渡す
 * - user が解決できていなければ 401
 */

mod core;

pub use self::core::AuthUser;
