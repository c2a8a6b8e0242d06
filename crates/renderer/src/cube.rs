/// One solid-coloured quadrilateral face of the cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeFace {
    pub color: [f32; 3],
    /// Corners in winding order.
    pub corners: [[f32; 3]; 4],
}

/// Unit cube spanning `[-1, 1]` on every axis, one colour per face.
pub const CUBE_FACES: [CubeFace; 6] = [
    // front
    CubeFace {
        color: [0.9, 0.3, 0.3],
        corners: [
            [-1.0, -1.0, 1.0],
            [1.0, -1.0, 1.0],
            [1.0, 1.0, 1.0],
            [-1.0, 1.0, 1.0],
        ],
    },
    // back
    CubeFace {
        color: [0.3, 0.9, 0.3],
        corners: [
            [-1.0, -1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [1.0, 1.0, -1.0],
            [1.0, -1.0, -1.0],
        ],
    },
    // top
    CubeFace {
        color: [0.3, 0.3, 0.9],
        corners: [
            [-1.0, 1.0, -1.0],
            [-1.0, 1.0, 1.0],
            [1.0, 1.0, 1.0],
            [1.0, 1.0, -1.0],
        ],
    },
    // bottom
    CubeFace {
        color: [0.9, 0.9, 0.3],
        corners: [
            [-1.0, -1.0, -1.0],
            [1.0, -1.0, -1.0],
            [1.0, -1.0, 1.0],
            [-1.0, -1.0, 1.0],
        ],
    },
    // right
    CubeFace {
        color: [0.3, 0.9, 0.9],
        corners: [
            [1.0, -1.0, -1.0],
            [1.0, 1.0, -1.0],
            [1.0, 1.0, 1.0],
            [1.0, -1.0, 1.0],
        ],
    },
    // left
    CubeFace {
        color: [0.9, 0.3, 0.9],
        corners: [
            [-1.0, -1.0, -1.0],
            [-1.0, -1.0, 1.0],
            [-1.0, 1.0, 1.0],
            [-1.0, 1.0, -1.0],
        ],
    },
];

impl CubeFace {
    /// Splits the quad into two triangles sharing the first corner.
    pub fn triangles(&self) -> [[f32; 3]; 6] {
        let [a, b, c, d] = self.corners;
        [a, b, c, a, c, d]
    }
}
