//! External load vector.

use nalgebra::DVector;
use sn_core::Real;
use sn_graph::DofMap;

/// Gravity load: `f_i = M_i·g` on free vertical DOFs, 0 elsewhere.
pub fn gravity_load(dofs: &DofMap, gravity: Real) -> DVector<Real> {
    let mass = dofs.lumped_mass();
    DVector::from_fn(dofs.dof_count(), |i, _| {
        if !dofs.is_fixed(i) && dofs.is_vertical(i) {
            mass[i] * gravity
        } else {
            0.0
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sn_core::Dim;
    use sn_graph::NetworkBuilder;

    #[test]
    fn gravity_only_on_free_vertical_dofs() {
        let mut builder = NetworkBuilder::new();
        let a = builder.add_fixed_node("a", [0.0; 3]);
        let b = builder.add_node("b", 2.0, [0.0, -1.0, 0.0]);
        builder.add_spring(a, b, 1.0);
        let network = builder.build().unwrap();

        let dofs = DofMap::from_network(&network, Dim::Three);
        let f = gravity_load(&dofs, -10.0);
        assert_eq!(f.as_slice(), &[0.0, 0.0, 0.0, 0.0, -20.0, 0.0]);

        let scalar = DofMap::from_network(&network, Dim::One);
        let f = gravity_load(&scalar, -10.0);
        assert_eq!(f.as_slice(), &[0.0, -20.0]);
    }
}
