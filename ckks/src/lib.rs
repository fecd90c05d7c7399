pub mod boot_context;
pub mod bootstrapping;
pub mod chebyshev;
pub mod ciphertext;
pub mod decryptor;
pub mod encoder;
pub mod encryptor;
pub mod error;
pub mod evaluator;
pub mod key_generator;
pub mod key_switching;
pub mod keys;
pub mod linear_transform;
pub mod parameters;
pub mod plaintext;
pub mod sine;

pub use boot_context::{BootContext, BootParameters};
pub use chebyshev::ChebyshevInterpolation;
pub use ciphertext::Ciphertext;
pub use decryptor::Decryptor;
pub use encoder::Encoder;
pub use encryptor::{EncryptionKey, Encryptor};
pub use error::{ConstructionError, Error, PreconditionViolation, Result};
pub use evaluator::Evaluator;
pub use key_generator::KeyGenerator;
pub use keys::{PublicKey, RelinearizationKey, RotationKeys, SecretKey, SwitchingKey};
pub use parameters::{Parameters, ParametersLiteral};
pub use plaintext::Plaintext;
