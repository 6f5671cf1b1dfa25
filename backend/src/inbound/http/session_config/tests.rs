//! Environment handling for session settings in both build modes.

use std::collections::HashMap;
use std::io::Write;

use mockable::MockEnv;
use rstest::{fixture, rstest};
use tempfile::NamedTempFile;

use super::*;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(&vec![b'k'; len]).expect("write key");
    file
}

fn path_of(file: &NamedTempFile) -> String {
    file.path().to_string_lossy().into_owned()
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |name| vars.get(name).cloned());
    env
}

struct ReleaseEnv {
    _key: NamedTempFile,
    vars: HashMap<&'static str, String>,
}

impl ReleaseEnv {
    fn set(mut self, name: &'static str, value: &str) -> Self {
        self.vars.insert(name, value.to_owned());
        self
    }

    fn unset(mut self, name: &'static str) -> Self {
        self.vars.remove(name);
        self
    }

    fn load(&self, mode: BuildMode) -> Result<SessionSettings, SessionConfigError> {
        session_settings_from_env(&mock_env(self.vars.clone()), mode)
    }
}

#[fixture]
fn release_env() -> ReleaseEnv {
    let key = key_file(RELEASE_SESSION_KEY_MIN_LEN);
    let vars = HashMap::from([
        (KEY_FILE_ENV, path_of(&key)),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ]);
    ReleaseEnv { _key: key, vars }
}

#[rstest]
fn complete_release_configuration_loads(release_env: ReleaseEnv) {
    let settings = release_env.load(BuildMode::Release).expect("valid settings");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
    let expected = Key::derive_from(&[b'k'; RELEASE_SESSION_KEY_MIN_LEN]);
    assert_eq!(settings.fingerprint(), key_fingerprint(&expected));
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_requires_every_toggle(release_env: ReleaseEnv, #[case] name: &'static str) {
    let err = release_env
        .unset(name)
        .load(BuildMode::Release)
        .expect_err("missing toggle must fail");
    assert!(matches!(err, SessionConfigError::MissingEnv { name: missing } if missing == name));
}

#[rstest]
#[case(COOKIE_SECURE_ENV, "maybe")]
#[case(ALLOW_EPHEMERAL_ENV, "")]
#[case(SAMESITE_ENV, "sideways")]
fn release_rejects_unparseable_toggles(
    release_env: ReleaseEnv,
    #[case] name: &'static str,
    #[case] value: &str,
) {
    let err = release_env
        .set(name, value)
        .load(BuildMode::Release)
        .expect_err("invalid toggle must fail");
    assert!(matches!(err, SessionConfigError::InvalidEnv { name: bad, .. } if bad == name));
}

#[rstest]
fn release_rejects_ephemeral_keys(release_env: ReleaseEnv) {
    let err = release_env
        .set(ALLOW_EPHEMERAL_ENV, "yes")
        .load(BuildMode::Release)
        .expect_err("ephemeral must fail");
    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_rejects_insecure_same_site_none(release_env: ReleaseEnv) {
    let err = release_env
        .set(COOKIE_SECURE_ENV, "0")
        .set(SAMESITE_ENV, "None")
        .load(BuildMode::Release)
        .expect_err("SameSite=None without Secure must fail");
    assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn release_rejects_unreadable_key(release_env: ReleaseEnv) {
    let err = release_env
        .set(KEY_FILE_ENV, "/nonexistent/authgate/session_key")
        .load(BuildMode::Release)
        .expect_err("missing key must fail");
    assert!(matches!(err, SessionConfigError::KeyRead { .. }));
}

#[rstest]
#[case(BuildMode::Release, SESSION_KEY_MIN_LEN, RELEASE_SESSION_KEY_MIN_LEN)]
#[case(BuildMode::Debug, SESSION_KEY_MIN_LEN - 1, SESSION_KEY_MIN_LEN)]
fn short_keys_are_rejected(
    release_env: ReleaseEnv,
    #[case] mode: BuildMode,
    #[case] length: usize,
    #[case] min_len: usize,
) {
    let short = key_file(length);
    let err = release_env
        .set(KEY_FILE_ENV, &path_of(&short))
        .load(mode)
        .expect_err("short key must fail");
    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort { length: got, min_len: need, .. }
            if got == length && need == min_len
    ));
}

#[rstest]
fn debug_defaults_are_insecure_lax_with_ephemeral_key() {
    let env = mock_env(HashMap::from([(
        KEY_FILE_ENV,
        "/nonexistent/authgate/session_key".to_owned(),
    )]));
    let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");

    assert!(!settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_tolerates_invalid_toggles(release_env: ReleaseEnv) {
    let settings = release_env
        .set(SAMESITE_ENV, "sideways")
        .set(COOKIE_SECURE_ENV, "perhaps")
        .load(BuildMode::Debug)
        .expect("debug falls back");

    assert_eq!(settings.same_site, SameSite::Lax);
    assert!(!settings.cookie_secure);
}

#[rstest]
#[case(31, true)]
#[case(32, false)]
fn inline_secrets_need_thirty_two_bytes(#[case] length: usize, #[case] rejected: bool) {
    let result = SessionSettings::from_secret(&vec![0_u8; length], false, SameSite::Lax);
    assert_eq!(result.is_err(), rejected);
}

#[rstest]
fn debug_output_hides_key_material() {
    let settings =
        SessionSettings::from_secret(&[9_u8; 64], true, SameSite::Strict).expect("valid secret");
    let rendered = format!("{settings:?}");
    assert!(rendered.contains(&settings.fingerprint()));
}
