//! Projection of the document forest into labeled display order
//!
//! After any structural change the view relabels its trees from the flat
//! pre-order walk produced here. Labels are always computed from the
//! collection positions, never parsed back out of the view, and the index
//! counter restarts at every container boundary. Group containers with no
//! children are pruned from the walk. A selector whose palette reference
//! no longer resolves is labeled with the NULL sentinel instead of
//! failing the walk.

use serde::{Deserialize, Serialize};

use crate::models::{
    preview_rgba, CollectionKind, Document, EntryRef, ImageHandle, RenderCache,
};

/// One node of the flattened, labeled forest
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProjectedNode {
    pub entry: EntryRef,
    pub depth: usize,
    pub label: String,
    pub image: Option<ImageHandle>,
    pub preview: Option<[u8; 4]>,
}

impl ProjectedNode {
    fn plain(entry: EntryRef, depth: usize, label: String) -> Self {
        Self {
            entry,
            depth,
            label,
            image: None,
            preview: None,
        }
    }
}

/// Relabel one top-level collection in display order
pub fn project(
    document: &Document,
    cache: &RenderCache,
    kind: CollectionKind,
) -> Vec<ProjectedNode> {
    match kind {
        CollectionKind::PartSets => project_part_sets(document, cache),
        CollectionKind::PartColors => project_part_colors(document, cache),
        CollectionKind::Bodies => project_bodies(document),
        CollectionKind::Skeletons => project_skeletons(document),
    }
}

fn project_part_sets(document: &Document, cache: &RenderCache) -> Vec<ProjectedNode> {
    let mut nodes = Vec::new();
    for (set_index, part_set) in document.part_sets.iter().enumerate() {
        nodes.push(ProjectedNode::plain(
            EntryRef::PartSet { part_set: set_index },
            0,
            format!("{set_index}: Part Set"),
        ));
        for (slot, part) in &part_set.parts {
            nodes.push(ProjectedNode::plain(
                EntryRef::Part {
                    part_set: set_index,
                    slot: *slot,
                },
                1,
                format!("{}: {}", slot.ordinal(), slot.title()),
            ));

            // Empty groups are pruned rather than shown as placeholders
            if !part.color_selectors.is_empty() {
                nodes.push(ProjectedNode::plain(
                    EntryRef::ColorSelectorList {
                        part_set: set_index,
                        slot: *slot,
                    },
                    2,
                    "Color Selectors".to_string(),
                ));
                for (selector_index, selector) in part.color_selectors.iter().enumerate() {
                    let entry = EntryRef::ColorSelector {
                        part_set: set_index,
                        slot: *slot,
                        index: selector_index,
                    };
                    let palette_index = selector.palette_index as usize;
                    let color_index = selector.color_index as usize;
                    let resolved = document.palette_name(palette_index).and_then(|name| {
                        cache
                            .handle(palette_index, color_index)
                            .map(|handle| (name, handle))
                    });
                    match resolved {
                        Some((name, handle)) => nodes.push(ProjectedNode {
                            entry,
                            depth: 3,
                            label: format!("{selector_index}: {name}, {color_index}"),
                            image: Some(handle),
                            preview: document
                                .part_colors
                                .get(palette_index)
                                .and_then(|palette| preview_rgba(palette, color_index)),
                        }),
                        None => nodes.push(ProjectedNode::plain(
                            entry,
                            3,
                            format!("{selector_index}: NULL, -1"),
                        )),
                    }
                }
            }

            if !part.physics.is_empty() {
                nodes.push(ProjectedNode::plain(
                    EntryRef::PhysicsList {
                        part_set: set_index,
                        slot: *slot,
                    },
                    2,
                    "Physics".to_string(),
                ));
                for physics_index in 0..part.physics.len() {
                    nodes.push(ProjectedNode::plain(
                        EntryRef::Physics {
                            part_set: set_index,
                            slot: *slot,
                            index: physics_index,
                        },
                        3,
                        format!("{physics_index}"),
                    ));
                }
            }
        }
    }
    nodes
}

fn project_part_colors(document: &Document, cache: &RenderCache) -> Vec<ProjectedNode> {
    let mut nodes = Vec::new();
    for (palette_index, palette) in document.part_colors.iter().enumerate() {
        nodes.push(ProjectedNode::plain(
            EntryRef::PartColor {
                part_color: palette_index,
            },
            0,
            format!("{palette_index}: {}", palette.name),
        ));
        for color_index in 0..palette.colors.len() {
            nodes.push(ProjectedNode {
                entry: EntryRef::Color {
                    part_color: palette_index,
                    index: color_index,
                },
                depth: 1,
                label: format!("{color_index}"),
                image: cache.handle(palette_index, color_index),
                preview: preview_rgba(palette, color_index),
            });
        }
    }
    nodes
}

fn project_bodies(document: &Document) -> Vec<ProjectedNode> {
    let mut nodes = Vec::new();
    for (body_index, body) in document.bodies.iter().enumerate() {
        nodes.push(ProjectedNode::plain(
            EntryRef::Body { body: body_index },
            0,
            format!("{body_index}: Body"),
        ));
        for (scale_index, bone_scale) in body.bone_scales.iter().enumerate() {
            nodes.push(ProjectedNode::plain(
                EntryRef::BoneScale {
                    body: body_index,
                    index: scale_index,
                },
                1,
                format!("{scale_index}: {}", bone_scale.name),
            ));
        }
    }
    nodes
}

fn project_skeletons(document: &Document) -> Vec<ProjectedNode> {
    let mut nodes = Vec::new();
    for (skeleton_index, skeleton) in document.skeletons.iter().enumerate() {
        nodes.push(ProjectedNode::plain(
            EntryRef::Skeleton {
                skeleton: skeleton_index,
            },
            0,
            format!("{skeleton_index}: Skeleton"),
        ));
        for (bone_index, bone) in skeleton.bones.iter().enumerate() {
            nodes.push(ProjectedNode::plain(
                EntryRef::Bone {
                    skeleton: skeleton_index,
                    index: bone_index,
                },
                1,
                format!("{bone_index}: {}", bone.name),
            ));
        }
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Color, ColorSelector, Part, PartColor, PartSet, PartSlot, Physics};

    fn sample_document() -> Document {
        let mut doc = Document::new();
        doc.part_colors.push(PartColor {
            name: "skin_".to_string(),
            colors: vec![Color::default(), Color::default()],
        });

        let mut part = Part::default();
        part.color_selectors.push(ColorSelector {
            palette_index: 0,
            color_index: 1,
        });
        part.color_selectors.push(ColorSelector {
            palette_index: 5,
            color_index: 0,
        });
        part.physics.push(Physics::default());

        let mut set = PartSet::default();
        set.parts.insert(PartSlot::Hair, part);
        set.parts.insert(PartSlot::Boots, Part::default());
        doc.part_sets.push(set);
        doc
    }

    #[test]
    fn part_set_labels_use_slot_ordinals() {
        let doc = sample_document();
        let mut cache = RenderCache::new();
        cache.rebuild(&doc);

        let nodes = project(&doc, &cache, CollectionKind::PartSets);
        let labels: Vec<&str> = nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "0: Part Set",
                "5: Hair",
                "Color Selectors",
                "0: skin_, 1",
                "1: NULL, -1",
                "Physics",
                "0",
                "9: Boots",
            ]
        );
    }

    #[test]
    fn dangling_selector_gets_sentinel_and_no_image() {
        let doc = sample_document();
        let mut cache = RenderCache::new();
        cache.rebuild(&doc);

        let nodes = project(&doc, &cache, CollectionKind::PartSets);
        let dangling = nodes.iter().find(|n| n.label.contains("NULL")).unwrap();
        assert_eq!(dangling.image, None);
        assert_eq!(dangling.preview, None);

        let resolved = nodes.iter().find(|n| n.label == "0: skin_, 1").unwrap();
        assert!(resolved.image.is_some());
    }

    #[test]
    fn empty_groups_are_pruned() {
        let doc = sample_document();
        let mut cache = RenderCache::new();
        cache.rebuild(&doc);

        let nodes = project(&doc, &cache, CollectionKind::PartSets);
        // The Boots part has neither selectors nor physics, so no group
        // containers follow it.
        let boots_pos = nodes.iter().position(|n| n.label == "9: Boots").unwrap();
        assert_eq!(boots_pos, nodes.len() - 1);
    }

    #[test]
    fn projection_is_idempotent() {
        let doc = sample_document();
        let mut cache = RenderCache::new();
        cache.rebuild(&doc);

        let first = project(&doc, &cache, CollectionKind::PartSets);
        let second = project(&doc, &cache, CollectionKind::PartSets);
        assert_eq!(first, second);
    }

    #[test]
    fn color_nodes_carry_cache_handles_in_order() {
        let doc = sample_document();
        let mut cache = RenderCache::new();
        cache.rebuild(&doc);

        let nodes = project(&doc, &cache, CollectionKind::PartColors);
        assert_eq!(nodes[0].label, "0: skin_");
        assert_eq!(nodes[1].image, cache.handle(0, 0));
        assert_eq!(nodes[2].image, cache.handle(0, 1));
    }
}
