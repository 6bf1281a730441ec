use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use bcrypt::Version;
use tracing::{debug, instrument};

use crate::err::{Error, Result};

// Consts

// bcrypt's radix-64 (`./A-Za-z0-9`), unpadded. Surplus trailing bits are
// tolerated: the last of the 22 salt symbols carries 4 bits crypt(3) ignores.
const BCRYPT_B64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::BCRYPT,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

// `$2<variant>$NN$` + 22 salt symbols
const SETTING_LENGTH: usize = 29;

// Traits

#[cfg_attr(test, mockall::automock)]
pub trait Crypt: Send + Sync {
    fn crypt(&self, password: &str, setting: &str) -> Result<String>;
}

// BcryptCrypt

pub struct BcryptCrypt;

impl Crypt for BcryptCrypt {
    #[instrument(skip(self, password, setting))]
    fn crypt(&self, password: &str, setting: &str) -> Result<String> {
        let (version, cost, salt) = parse_setting(setting)?;
        debug!(cost, "computing bcrypt digest");
        let parts = bcrypt::hash_with_salt(password, cost, salt)?;
        Ok(parts.format_for_version(version))
    }
}

// Functions

// Anything past the salt is ignored, so a full encoded hash is itself a valid
// setting.
fn parse_setting(setting: &str) -> Result<(Version, u32, [u8; 16])> {
    let bytes = setting.as_bytes();
    if bytes.len() < SETTING_LENGTH
        || bytes[0] != b'$'
        || bytes[1] != b'2'
        || bytes[3] != b'$'
        || bytes[6] != b'$'
    {
        return Err(Error::MalformedSetting);
    }
    let version = match bytes[2] {
        b'a' => Version::TwoA,
        b'b' => Version::TwoB,
        b'x' => Version::TwoX,
        b'y' => Version::TwoY,
        _ => return Err(Error::MalformedSetting),
    };
    if !bytes[4].is_ascii_digit() || !bytes[5].is_ascii_digit() {
        return Err(Error::MalformedSetting);
    }
    let cost = u32::from((bytes[4] - b'0') * 10 + (bytes[5] - b'0'));
    let salt = BCRYPT_B64
        .decode(&bytes[7..SETTING_LENGTH])
        .map_err(|_| Error::MalformedSetting)?
        .try_into()
        .map_err(|_| Error::MalformedSetting)?;
    Ok((version, cost, salt))
}

// Tests

#[cfg(test)]
mod test {
    use crate::test::*;

    use super::*;

    // Mods

    mod bcrypt_crypt {
        use super::*;

        // Mods

        mod crypt {
            use super::*;

            // Data

            #[derive(Clone)]
            struct Data {
                password: &'static str,
                setting: String,
            }

            impl Default for Data {
                fn default() -> Self {
                    Self {
                        password: "testP@$$w0rd",
                        setting: format!("$2y$04${}", ".".repeat(22)),
                    }
                }
            }

            // Tests

            #[test]
            fn test() {
                init_tracer();
                let data = Data::default();
                let crypt = BcryptCrypt;
                let hash = crypt.crypt(data.password, &data.setting).unwrap();
                assert!(hash.starts_with(&data.setting));
                assert_eq!(hash.len(), 60);
                let rehash = crypt.crypt(data.password, &hash).unwrap();
                assert_eq!(rehash, hash);
            }

            #[test]
            fn other_variant() {
                init_tracer();
                let data = Data {
                    setting: format!("$2b$04${}", ".".repeat(22)),
                    ..Default::default()
                };
                let crypt = BcryptCrypt;
                let hash = crypt.crypt(data.password, &data.setting).unwrap();
                assert!(hash.starts_with("$2b$04$"));
            }

            #[test]
            fn malformed_setting() {
                init_tracer();
                let data = Data::default();
                let crypt = BcryptCrypt;
                let settings = [
                    String::new(),
                    "$2y$04$".into(),
                    "plainly not a setting".into(),
                    format!("$1y$04${}", ".".repeat(22)),
                    format!("$2z$04${}", ".".repeat(22)),
                    format!("$2y$4a${}", ".".repeat(22)),
                    format!("$2y$04${}!", ".".repeat(21)),
                ];
                for setting in settings {
                    let res = crypt.crypt(data.password, &setting);
                    assert!(matches!(res, Err(Error::MalformedSetting)), "{setting}");
                }
            }

            #[test]
            fn cost_out_of_range() {
                init_tracer();
                let data = Data {
                    setting: format!("$2y$03${}", ".".repeat(22)),
                    ..Default::default()
                };
                let crypt = BcryptCrypt;
                let res = crypt.crypt(data.password, &data.setting);
                assert!(matches!(res, Err(Error::Bcrypt(_))));
            }
        }
    }
}
