//! Auxiliary dump: resolves user-configured dotted/bracketed attribute
//! paths (e.g. `parts.trunk.maint`, `layers[1].fluxes["influx"]`) against a
//! flattened name-to-value view each component publishes.

use std::collections::HashMap;

use palmsim_crop::{Crop, PartKind};
use palmsim_soil::SoilWaterProfile;

/// A component that can publish a flattened `name -> value` view of its
/// state for the auxiliary dump.
pub trait AttributeSource {
    fn attributes(&self) -> HashMap<String, f64>;
}

fn part_name(kind: PartKind) -> &'static str {
    match kind {
        PartKind::Pinnae => "pinnae",
        PartKind::Rachis => "rachis",
        PartKind::Trunk => "trunk",
        PartKind::Roots => "roots",
        PartKind::MaleFlowers => "maleflowers",
        PartKind::FemaleFlowers => "femaleflowers",
        PartKind::Bunches => "bunches",
    }
}

impl AttributeSource for Crop {
    fn attributes(&self) -> HashMap<String, f64> {
        let mut map = HashMap::new();
        for (kind, part) in &self.parts {
            let name = part_name(*kind);
            map.insert(format!("parts.{name}.weight"), part.weight_kg);
            map.insert(format!("parts.{name}.maint"), part.maintenance_demand);
            map.insert(format!("parts.{name}.partition"), part.partition_fraction);
            map.insert(format!("parts.{name}.growth"), part.growth_rate);
            map.insert(format!("parts.{name}.death"), part.death_rate);
        }
        map.insert("treeage".into(), self.tree_age_days);
        map.insert("vdm".into(), self.vdm_kg);
        map.insert("tdm".into(), self.tdm_kg);
        map.insert("bunchyield".into(), self.bunch_yield_kg);
        map.insert("height".into(), self.tree_height_m);
        map.insert("lai".into(), self.lai());
        map
    }
}

impl AttributeSource for SoilWaterProfile {
    fn attributes(&self) -> HashMap<String, f64> {
        let mut map = HashMap::new();
        for (i, layer) in self.layers.iter().enumerate() {
            map.insert(format!("layers.{i}.vwc"), layer.vwc);
            map.insert(format!("layers.{i}.matrichead"), layer.matric_head_m);
            map.insert(format!("layers.{i}.gravityhead"), layer.gravity_head_m);
            map.insert(format!("layers.{i}.conductivity"), layer.conductivity);
            map.insert(format!("layers.{i}.fluxes.t"), layer.flux_t);
            map.insert(format!("layers.{i}.fluxes.e"), layer.flux_e);
            map.insert(format!("layers.{i}.fluxes.influx"), layer.flux_influx);
            map.insert(format!("layers.{i}.fluxes.outflux"), layer.flux_outflux);
            map.insert(format!("layers.{i}.fluxes.netflux"), layer.flux_netflux);
        }
        map.insert("rootdepth".into(), self.root_depth_m);
        map.insert("rootzone.current".into(), self.root_zone.current);
        map.insert("rootzone.critical".into(), self.root_zone.critical);
        map.insert("overflow".into(), self.cumulative_overflow_m);
        map
    }
}

/// One token of a parsed attribute path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Field(String),
    Index(usize),
}

/// Parse `layers[1].fluxes["influx"]`-style syntax into a flat dotted key
/// matching the convention used by [`AttributeSource::attributes`].
fn tokenize(path: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if !current.is_empty() {
                    tokens.push(Token::Field(std::mem::take(&mut current)));
                }
            }
            '[' => {
                if !current.is_empty() {
                    tokens.push(Token::Field(std::mem::take(&mut current)));
                }
                let mut inner = String::new();
                for c2 in chars.by_ref() {
                    if c2 == ']' {
                        break;
                    }
                    inner.push(c2);
                }
                let trimmed = inner.trim().trim_matches(|c| c == '"' || c == '\'');
                if let Ok(idx) = trimmed.parse::<usize>() {
                    tokens.push(Token::Index(idx));
                } else {
                    tokens.push(Token::Field(trimmed.to_string()));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(Token::Field(current));
    }
    tokens
}

/// Normalize an auxiliary path expression into the flat dotted key used by
/// component attribute maps.
pub fn normalize_path(path: &str) -> String {
    tokenize(path)
        .into_iter()
        .map(|t| match t {
            Token::Field(f) => f,
            Token::Index(i) => i.to_string(),
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Resolve a dotted/bracketed path against a merged attribute registry.
pub fn resolve(registry: &HashMap<String, f64>, path: &str) -> Option<f64> {
    registry.get(&normalize_path(path)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_bracket_and_quoted_key_syntax() {
        assert_eq!(normalize_path("layers[1].fluxes[\"influx\"]"), "layers.1.fluxes.influx");
        assert_eq!(normalize_path("parts.trunk.maint"), "parts.trunk.maint");
    }

    #[test]
    fn resolves_from_registry() {
        let mut registry = HashMap::new();
        registry.insert("layers.1.fluxes.influx".to_string(), 0.0123);
        assert_eq!(resolve(&registry, "layers[1].fluxes[\"influx\"]"), Some(0.0123));
        assert_eq!(resolve(&registry, "layers[2].fluxes.influx"), None);
    }
}
