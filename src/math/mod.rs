pub mod interp;
pub mod matrix3;
pub mod ode;
pub mod quaternion;
pub mod vec3;

pub use matrix3::Matrix3Ext;
pub use quaternion::QuaternionExt;
pub use vec3::Vec3Ext;
