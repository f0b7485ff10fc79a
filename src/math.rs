//! Small 3D math helpers shared by the simulation core and the renderer.
//!
//! Everything works on plain `[f64; 3]` vectors and row-major `[[f64; 3]; 3]`
//! matrices; the cube is small enough that a linear algebra crate would be
//! overkill.

/// A 3-dimensional vector.
pub type Vec3 = [f64; 3];

/// A row-major 3x3 matrix.
pub type Mat3 = [[f64; 3]; 3];

/// The 3x3 identity matrix.
pub fn identity() -> Mat3 {
    [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
}

/// Rotation about the X axis by `angle` radians.
pub fn rotation_x(angle: f64) -> Mat3 {
    let (sin_a, cos_a) = angle.sin_cos();
    [[1.0, 0.0, 0.0], [0.0, cos_a, -sin_a], [0.0, sin_a, cos_a]]
}

/// Rotation about the Y axis by `angle` radians.
pub fn rotation_y(angle: f64) -> Mat3 {
    let (sin_a, cos_a) = angle.sin_cos();
    [[cos_a, 0.0, sin_a], [0.0, 1.0, 0.0], [-sin_a, 0.0, cos_a]]
}

/// Rotation about the Z axis by `angle` radians.
pub fn rotation_z(angle: f64) -> Mat3 {
    let (sin_a, cos_a) = angle.sin_cos();
    [[cos_a, -sin_a, 0.0], [sin_a, cos_a, 0.0], [0.0, 0.0, 1.0]]
}

/// Multiplies a 3x3 matrix by a 3-dimensional vector
pub fn multiply_matrix_vector(matrix: &Mat3, vector: &Vec3) -> Vec3 {
    let mut result = [0.0; 3];
    for i in 0..3 {
        for j in 0..3 {
            result[i] += matrix[i][j] * vector[j];
        }
    }
    result
}

/// Multiplies two 3x3 matrices
pub fn multiply_matrices(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut result = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    result
}

/// Transposes a 3x3 matrix
pub fn transpose(m: &Mat3) -> Mat3 {
    let mut result = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            result[i][j] = m[j][i];
        }
    }
    result
}

/// Determinant of a 3x3 matrix
pub fn determinant(m: &Mat3) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Whether `m` is a proper rotation: orthonormal with determinant +1,
/// within `epsilon` per entry.
pub fn is_rotation(m: &Mat3, epsilon: f64) -> bool {
    let product = multiply_matrices(m, &transpose(m));
    let id = identity();
    for i in 0..3 {
        for j in 0..3 {
            if (product[i][j] - id[i][j]).abs() > epsilon {
                return false;
            }
        }
    }
    (determinant(m) - 1.0).abs() <= epsilon
}

/// Edge function used in rasterization
pub fn edge_function(a: &[f64; 2], b: &[f64; 2], c: &[f64; 2]) -> f64 {
    (c[0] - a[0]) * (b[1] - a[1]) - (c[1] - a[1]) * (b[0] - a[0])
}

/// Calculates the normal vector of a triangle
pub fn calculate_normal(a: &Vec3, b: &Vec3, c: &Vec3) -> Vec3 {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let normal = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    let length = (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
    [normal[0] / length, normal[1] / length, normal[2] / length]
}

/// Calculates the light intensity based on the normal vector and light position
pub fn calculate_light_intensity(normal: &Vec3, position: &Vec3, light_pos: &Vec3) -> f64 {
    let light_dir = [
        light_pos[0] - position[0],
        light_pos[1] - position[1],
        light_pos[2] - position[2],
    ];
    let length = (light_dir[0] * light_dir[0]
        + light_dir[1] * light_dir[1]
        + light_dir[2] * light_dir[2])
        .sqrt();
    let light_dir = [
        light_dir[0] / length,
        light_dir[1] / length,
        light_dir[2] / length,
    ];
    let dot_product =
        normal[0] * light_dir[0] + normal[1] * light_dir[1] + normal[2] * light_dir[2];
    dot_product.max(0.1) // Ensure a minimum ambient light
}
