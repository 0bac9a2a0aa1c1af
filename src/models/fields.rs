//! Field-level record access
//!
//! The detail form and the find/replace dialogs address record fields by
//! name. This module maps those names onto the typed struct fields with a
//! closed value type, enforcing model-side constraints (the three-character
//! part name limit) on the way in.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entries::{Bone, BoneScale, Color, ColorSelector, Part, PartColor, Physics, MAX_NAME_LEN};

/// A single field value crossing the boundary
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum FieldValue {
    Int(u64),
    Float(f32),
    Text(String),
    Rgba([u8; 4]),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FieldError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("wrong value type for field '{0}'")]
    WrongType(String),
    #[error("invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

fn expect_int(field: &str, value: &FieldValue, max: u64) -> Result<u64, FieldError> {
    match value {
        FieldValue::Int(v) if *v <= max => Ok(*v),
        FieldValue::Int(v) => Err(FieldError::InvalidValue {
            field: field.to_string(),
            reason: format!("{v:#x} exceeds field maximum {max:#x}"),
        }),
        _ => Err(FieldError::WrongType(field.to_string())),
    }
}

fn expect_float(field: &str, value: &FieldValue) -> Result<f32, FieldError> {
    match value {
        FieldValue::Float(v) => Ok(*v),
        _ => Err(FieldError::WrongType(field.to_string())),
    }
}

fn expect_text(field: &str, value: &FieldValue) -> Result<String, FieldError> {
    match value {
        FieldValue::Text(v) => Ok(v.clone()),
        _ => Err(FieldError::WrongType(field.to_string())),
    }
}

fn expect_rgba(field: &str, value: &FieldValue) -> Result<[u8; 4], FieldError> {
    match value {
        FieldValue::Rgba(v) => Ok(*v),
        _ => Err(FieldError::WrongType(field.to_string())),
    }
}

/// A part/physics name: at most three characters
fn expect_short_name(field: &str, value: &FieldValue) -> Result<String, FieldError> {
    let text = expect_text(field, value)?;
    if text.chars().count() > MAX_NAME_LEN {
        return Err(FieldError::InvalidValue {
            field: field.to_string(),
            reason: format!("name '{text}' is longer than {MAX_NAME_LEN} characters"),
        });
    }
    Ok(text)
}

pub fn set_part_field(part: &mut Part, field: &str, value: &FieldValue) -> Result<(), FieldError> {
    match field {
        "name" => part.name = expect_short_name(field, value)?,
        "model" => part.model = expect_int(field, value, u16::MAX as u64)? as u16,
        "model2" => part.model2 = expect_int(field, value, u16::MAX as u64)? as u16,
        "texture" => part.texture = expect_int(field, value, u16::MAX as u64)? as u16,
        "emd_name" => part.emd_name = expect_text(field, value)?,
        "emm_name" => part.emm_name = expect_text(field, value)?,
        "emb_name" => part.emb_name = expect_text(field, value)?,
        "ean_name" => part.ean_name = expect_text(field, value)?,
        "dyt_options" => part.dyt_options = expect_int(field, value, u32::MAX as u64)? as u32,
        "part_hiding" => part.part_hiding = expect_int(field, value, u32::MAX as u64)? as u32,
        "u_06" => part.u_06 = expect_int(field, value, u16::MAX as u64)? as u16,
        "u_08" => part.u_08 = expect_int(field, value, u16::MAX as u64)? as u16,
        "u_10" => part.u_10 = expect_int(field, value, u64::MAX)?,
        "u_20" => part.u_20 = expect_int(field, value, u32::MAX as u64)? as u32,
        "f_24" => part.f_24 = expect_float(field, value)?,
        "f_28" => part.f_28 = expect_float(field, value)?,
        "u_2c" => part.u_2c = expect_int(field, value, u32::MAX as u64)? as u32,
        "u_30" => part.u_30 = expect_int(field, value, u32::MAX as u64)? as u32,
        "u_48" => part.u_48 = expect_int(field, value, u16::MAX as u64)? as u16,
        "u_50" => part.u_50 = expect_int(field, value, u16::MAX as u64)? as u16,
        _ => return Err(FieldError::UnknownField(field.to_string())),
    }
    Ok(())
}

pub fn get_part_field(part: &Part, field: &str) -> Option<FieldValue> {
    let value = match field {
        "name" => FieldValue::Text(part.name.clone()),
        "model" => FieldValue::Int(part.model as u64),
        "model2" => FieldValue::Int(part.model2 as u64),
        "texture" => FieldValue::Int(part.texture as u64),
        "emd_name" => FieldValue::Text(part.emd_name.clone()),
        "emm_name" => FieldValue::Text(part.emm_name.clone()),
        "emb_name" => FieldValue::Text(part.emb_name.clone()),
        "ean_name" => FieldValue::Text(part.ean_name.clone()),
        "dyt_options" => FieldValue::Int(part.dyt_options as u64),
        "part_hiding" => FieldValue::Int(part.part_hiding as u64),
        _ => return None,
    };
    Some(value)
}

pub fn set_physics_field(
    physics: &mut Physics,
    field: &str,
    value: &FieldValue,
) -> Result<(), FieldError> {
    match field {
        "name" => physics.name = expect_short_name(field, value)?,
        "texture" => physics.texture = expect_int(field, value, u16::MAX as u64)? as u16,
        "emd_name" => physics.emd_name = expect_text(field, value)?,
        "emm_name" => physics.emm_name = expect_text(field, value)?,
        "emb_name" => physics.emb_name = expect_text(field, value)?,
        "esk_name" => physics.esk_name = expect_text(field, value)?,
        "bone_name" => physics.bone_name = expect_text(field, value)?,
        "scd_name" => physics.scd_name = expect_text(field, value)?,
        "dyt_options" => physics.dyt_options = expect_int(field, value, u32::MAX as u64)? as u32,
        "part_hiding" => physics.part_hiding = expect_int(field, value, u32::MAX as u64)? as u32,
        "u_20" => physics.u_20 = expect_int(field, value, u32::MAX as u64)? as u32,
        _ => return Err(FieldError::UnknownField(field.to_string())),
    }
    Ok(())
}

pub fn get_physics_field(physics: &Physics, field: &str) -> Option<FieldValue> {
    let value = match field {
        "name" => FieldValue::Text(physics.name.clone()),
        "texture" => FieldValue::Int(physics.texture as u64),
        "emd_name" => FieldValue::Text(physics.emd_name.clone()),
        "emm_name" => FieldValue::Text(physics.emm_name.clone()),
        "esk_name" => FieldValue::Text(physics.esk_name.clone()),
        "bone_name" => FieldValue::Text(physics.bone_name.clone()),
        "scd_name" => FieldValue::Text(physics.scd_name.clone()),
        "dyt_options" => FieldValue::Int(physics.dyt_options as u64),
        "part_hiding" => FieldValue::Int(physics.part_hiding as u64),
        _ => return None,
    };
    Some(value)
}

pub fn set_selector_field(
    selector: &mut ColorSelector,
    field: &str,
    value: &FieldValue,
) -> Result<(), FieldError> {
    match field {
        "palette_index" => {
            selector.palette_index = expect_int(field, value, u16::MAX as u64)? as u16
        }
        "color_index" => selector.color_index = expect_int(field, value, u16::MAX as u64)? as u16,
        _ => return Err(FieldError::UnknownField(field.to_string())),
    }
    Ok(())
}

pub fn get_selector_field(selector: &ColorSelector, field: &str) -> Option<FieldValue> {
    match field {
        "palette_index" => Some(FieldValue::Int(selector.palette_index as u64)),
        "color_index" => Some(FieldValue::Int(selector.color_index as u64)),
        _ => None,
    }
}

pub fn set_part_color_field(
    part_color: &mut PartColor,
    field: &str,
    value: &FieldValue,
) -> Result<(), FieldError> {
    match field {
        "name" => part_color.name = expect_text(field, value)?,
        _ => return Err(FieldError::UnknownField(field.to_string())),
    }
    Ok(())
}

pub fn set_color_field(color: &mut Color, field: &str, value: &FieldValue) -> Result<(), FieldError> {
    match field {
        "color1" => color.color1 = expect_rgba(field, value)?,
        "color2" => color.color2 = expect_rgba(field, value)?,
        "color3" => color.color3 = expect_rgba(field, value)?,
        "color4" => color.color4 = expect_rgba(field, value)?,
        "f_40" => color.f_40 = expect_float(field, value)?,
        "f_44" => color.f_44 = expect_float(field, value)?,
        "f_48" => color.f_48 = expect_float(field, value)?,
        "f_4c" => color.f_4c = expect_float(field, value)?,
        _ => return Err(FieldError::UnknownField(field.to_string())),
    }
    Ok(())
}

pub fn set_bone_scale_field(
    bone_scale: &mut BoneScale,
    field: &str,
    value: &FieldValue,
) -> Result<(), FieldError> {
    match field {
        "name" => bone_scale.name = expect_text(field, value)?,
        "x" => bone_scale.x = expect_float(field, value)?,
        "y" => bone_scale.y = expect_float(field, value)?,
        "z" => bone_scale.z = expect_float(field, value)?,
        _ => return Err(FieldError::UnknownField(field.to_string())),
    }
    Ok(())
}

pub fn set_bone_field(bone: &mut Bone, field: &str, value: &FieldValue) -> Result<(), FieldError> {
    match field {
        "name" => bone.name = expect_text(field, value)?,
        "u_00" => bone.u_00 = expect_int(field, value, u32::MAX as u64)? as u32,
        "u_04" => bone.u_04 = expect_int(field, value, u32::MAX as u64)? as u32,
        "u_08" => bone.u_08 = expect_int(field, value, u32::MAX as u64)? as u32,
        "u_0c" => bone.u_0c = expect_int(field, value, u16::MAX as u64)? as u16,
        "u_0e" => bone.u_0e = expect_int(field, value, u16::MAX as u64)? as u16,
        "u_10" => bone.u_10 = expect_int(field, value, u16::MAX as u64)? as u16,
        "u_12" => bone.u_12 = expect_int(field, value, u16::MAX as u64)? as u16,
        "u_14" => bone.u_14 = expect_int(field, value, u16::MAX as u64)? as u16,
        "u_16" => bone.u_16 = expect_int(field, value, u16::MAX as u64)? as u16,
        "u_18" => bone.u_18 = expect_int(field, value, u16::MAX as u64)? as u16,
        "u_1a" => bone.u_1a = expect_int(field, value, u16::MAX as u64)? as u16,
        "u_1c" => bone.u_1c = expect_int(field, value, u16::MAX as u64)? as u16,
        "u_1e" => bone.u_1e = expect_int(field, value, u16::MAX as u64)? as u16,
        "u_20" => bone.u_20 = expect_int(field, value, u16::MAX as u64)? as u16,
        "u_22" => bone.u_22 = expect_int(field, value, u16::MAX as u64)? as u16,
        "u_24" => bone.u_24 = expect_int(field, value, u16::MAX as u64)? as u16,
        "u_26" => bone.u_26 = expect_int(field, value, u16::MAX as u64)? as u16,
        "u_28" => bone.u_28 = expect_int(field, value, u16::MAX as u64)? as u16,
        "u_2a" => bone.u_2a = expect_int(field, value, u16::MAX as u64)? as u16,
        "u_2c" => bone.u_2c = expect_int(field, value, u16::MAX as u64)? as u16,
        "u_2e" => bone.u_2e = expect_int(field, value, u16::MAX as u64)? as u16,
        _ => return Err(FieldError::UnknownField(field.to_string())),
    }
    Ok(())
}
