use viewer_scene::{ObjectCounts, ObjectKind};

/// One instanced draw: a group of same-kind objects occupying consecutive
/// slots of the instance buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawBatch {
    pub kind: ObjectKind,
    pub first_instance: u32,
    pub instance_count: u32,
}

impl DrawBatch {
    pub fn instances(&self) -> std::ops::Range<u32> {
        self.first_instance..self.first_instance + self.instance_count
    }
}

/// Draw batches in instance-buffer order: triangles, quads, then the single
/// subject. Empty groups produce no batch; offsets match the scene's packing.
pub fn draw_batches(counts: ObjectCounts) -> Vec<DrawBatch> {
    let groups = [
        (ObjectKind::Triangle, counts.triangle),
        (ObjectKind::Quad, counts.quad),
        (ObjectKind::Subject, 1),
    ];
    let mut offset = 0;
    let mut batches = Vec::with_capacity(groups.len());
    for (kind, count) in groups {
        if count > 0 {
            batches.push(DrawBatch {
                kind,
                first_instance: offset,
                instance_count: count,
            });
        }
        offset += count;
    }
    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use viewer_scene::Scene;

    #[test]
    fn subject_only() {
        let batches = draw_batches(ObjectCounts::default());
        assert_eq!(
            batches,
            vec![DrawBatch {
                kind: ObjectKind::Subject,
                first_instance: 0,
                instance_count: 1
            }]
        );
    }

    #[test]
    fn offsets_run_through_groups() {
        let batches = draw_batches(ObjectCounts {
            triangle: 11,
            quad: 441,
        });
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].instances(), 0..11);
        assert_eq!(batches[1].instances(), 11..452);
        assert_eq!(batches[2].instances(), 452..453);
    }

    #[test]
    fn batches_line_up_with_scene_slots() {
        let mut scene = Scene::builder()
            .triangle(Vec3::new(0.0, 0.0, 0.0))
            .quad(Vec3::new(1.0, 0.0, 0.0))
            .quad(Vec3::new(2.0, 0.0, 0.0))
            .build()
            .unwrap();
        scene.update();
        for batch in draw_batches(scene.object_counts()) {
            for slot in batch.instances() {
                assert_eq!(scene.objects()[slot as usize].kind, batch.kind);
            }
        }
        let total: u32 = draw_batches(scene.object_counts())
            .iter()
            .map(|b| b.instance_count)
            .sum();
        assert_eq!(total as usize, scene.transforms().len());
    }
}
