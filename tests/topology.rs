// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Adjacency invariants over generated meshes of every kind

use anyhow::Result;
use meshview::geometry::{MeshCore, VolumeMesh};
use meshview::{AnyMesh, Geometry, Primitive, SliceBox};
use nalgebra::Point3;
use std::collections::HashSet;

fn assert_symmetric<'a>(
    label: &str,
    count: usize,
    a2b: impl Fn(usize) -> &'a [usize],
    b2a: impl Fn(usize) -> &'a [usize],
) {
    for a in 0..count {
        for &b in a2b(a) {
            assert!(b2a(b).contains(&a), "{}: {} -> {} has no reverse link", label, a, b);
        }
    }
}

fn check_core(core: &MeshCore) {
    let (nv, ne, np) = (core.num_vertices(), core.num_edges(), core.num_polys());
    assert_symmetric("v2v", nv, |v| core.adj_v2v(v), |v| core.adj_v2v(v));
    assert_symmetric("v2e", nv, |v| core.adj_v2e(v), |e| core.adj_e2v(e));
    assert_symmetric("e2v", ne, |e| core.adj_e2v(e), |v| core.adj_v2e(v));
    assert_symmetric("v2p", nv, |v| core.adj_v2p(v), |p| core.adj_p2v(p));
    assert_symmetric("p2v", np, |p| core.adj_p2v(p), |v| core.adj_v2p(v));
    assert_symmetric("e2e", ne, |e| core.adj_e2e(e), |e| core.adj_e2e(e));
    assert_symmetric("e2p", ne, |e| core.adj_e2p(e), |p| core.adj_p2e(p));
    assert_symmetric("p2e", np, |p| core.adj_p2e(p), |e| core.adj_e2p(e));
    assert_symmetric("p2p", np, |p| core.adj_p2p(p), |p| core.adj_p2p(p));

    let unique: HashSet<[usize; 2]> = core
        .edges()
        .iter()
        .map(|&[a, b]| [a.min(b), a.max(b)])
        .collect();
    assert_eq!(unique.len(), ne, "duplicate edges");
}

fn check_volume(volume: &VolumeMesh) {
    let core = volume.core();
    check_core(core);

    let (nv, ne, nf, np) = (core.num_vertices(), core.num_edges(), volume.num_faces(), core.num_polys());
    assert_symmetric("v2f", nv, |v| volume.adj_v2f(v), |f| volume.adj_f2v(f));
    assert_symmetric("f2v", nf, |f| volume.adj_f2v(f), |v| volume.adj_v2f(v));
    assert_symmetric("e2f", ne, |e| volume.adj_e2f(e), |f| volume.adj_f2e(f));
    assert_symmetric("f2e", nf, |f| volume.adj_f2e(f), |e| volume.adj_e2f(e));
    assert_symmetric("f2f", nf, |f| volume.adj_f2f(f), |f| volume.adj_f2f(f));
    assert_symmetric("f2p", nf, |f| volume.adj_f2p(f), |p| volume.adj_p2f(p));
    assert_symmetric("p2f", np, |p| volume.adj_p2f(p), |f| volume.adj_f2p(f));

    let unique: HashSet<Vec<usize>> = volume
        .faces()
        .iter()
        .map(|face| {
            let mut sorted = face.clone();
            sorted.sort_unstable();
            sorted
        })
        .collect();
    assert_eq!(unique.len(), nf, "duplicate faces");

    for fid in 0..nf {
        let cells = volume.adj_f2p(fid).len();
        assert!(cells == 1 || cells == 2, "face {} has {} cells", fid, cells);
        assert_eq!(volume.face_is_on_surf(fid), cells == 1);
    }

    for p in 0..np {
        for q in 0..np {
            if p == q {
                continue;
            }
            let shares_face = volume.adj_p2f(p).iter().any(|f| volume.adj_p2f(q).contains(f));
            assert_eq!(core.adj_p2p(p).contains(&q), shares_face, "cells {} and {}", p, q);
        }
    }
}

fn check_surface_adjacency(core: &MeshCore) {
    let np = core.num_polys();
    for p in 0..np {
        for q in 0..np {
            if p == q {
                continue;
            }
            let shared = core.adj_p2v(p).iter().filter(|v| core.adj_p2v(q).contains(v)).count();
            assert_eq!(core.adj_p2p(p).contains(&q), shared == 2, "polys {} and {}", p, q);
        }
    }
}

#[test]
fn test_surface_adjacency_is_symmetric() -> Result<()> {
    for primitive in [Primitive::tri_grid(3, 2, 1.0), Primitive::quad_grid(3, 2, 1.0)] {
        let mesh = primitive.to_mesh()?;
        check_core(mesh.core());
        check_surface_adjacency(mesh.core());
    }
    Ok(())
}

#[test]
fn test_volume_adjacency_is_symmetric() -> Result<()> {
    for primitive in [Primitive::hex_grid([2, 2, 2], 1.0), Primitive::tet_grid([2, 1, 1], 1.0)] {
        let mesh = primitive.to_mesh()?;
        let volume = mesh.as_volume().expect("volumetric primitive");
        check_volume(volume);
    }
    Ok(())
}

#[test]
fn test_hex_grid_counts() -> Result<()> {
    let mesh = Primitive::hex_grid([2, 2, 2], 1.0).to_mesh()?;
    let volume = mesh.as_volume().expect("hex grid");
    assert_eq!(mesh.core().num_vertices(), 27);
    assert_eq!(mesh.core().num_edges(), 54);
    assert_eq!(volume.num_faces(), 36);
    assert_eq!(volume.surface_face_count(), 24);
    Ok(())
}

#[test]
fn test_every_poly_edge_is_registered() -> Result<()> {
    let mesh = Primitive::quad_grid(2, 2, 1.0).to_mesh()?;
    let core = mesh.core();
    for pid in 0..core.num_polys() {
        let poly = core.adj_p2v(pid);
        for i in 0..poly.len() {
            let eid = core.edge_id(poly[i], poly[(i + 1) % poly.len()]).expect("poly edge");
            assert!(core.adj_p2e(pid).contains(&eid));
            assert!(core.adj_e2p(eid).contains(&pid));
        }
    }
    Ok(())
}

#[test]
fn test_visibility_changes_keep_structure() -> Result<()> {
    let mut mesh = Primitive::hex_grid([3, 1, 1], 1.0).to_mesh()?;
    let before = mesh.clone();

    let internal = (0..mesh.as_volume().expect("hex grid").num_faces())
        .find(|&f| !mesh.as_volume().expect("hex grid").face_is_on_surf(f))
        .expect("internal face");
    mesh.dig(internal);
    mesh.set_dirty(false);
    mesh.slice(SliceBox::new((0.0, 1.5), (-1.0, 2.0), (-1.0, 2.0)));
    mesh.undig(internal);
    mesh.reset();

    let (a, b) = (before.core(), mesh.core());
    assert_eq!(a.num_vertices(), b.num_vertices());
    assert_eq!(a.num_edges(), b.num_edges());
    assert_eq!(a.num_polys(), b.num_polys());
    for pid in 0..a.num_polys() {
        assert_eq!(a.adj_p2p(pid), b.adj_p2p(pid));
        assert_eq!(a.adj_p2e(pid), b.adj_p2e(pid));
    }
    assert_eq!(b.visible_count(), b.num_polys());
    Ok(())
}

#[test]
fn test_reset_restores_full_slice_box() -> Result<()> {
    let mut mesh = Primitive::hex_grid([2, 2, 1], 1.0).to_mesh()?;
    let full = SliceBox::from_bbox(&mesh.bounding_box());

    mesh.set_dirty(false);
    mesh.slice(SliceBox::new((0.0, 2.0), (0.0, 1.0), (0.0, 1.0)).inverted(false, true, false));
    assert_ne!(mesh.core().current_slice(), full);

    mesh.reset();
    assert!(mesh.is_dirty());
    assert_eq!(mesh.core().current_slice(), full);
    assert_eq!(mesh.core().visible_count(), mesh.core().num_polys());

    // the full box is already cached, so slicing with it changes nothing
    mesh.set_dirty(false);
    mesh.slice(full);
    assert!(!mesh.is_dirty());
    assert_eq!(mesh.core().visible_count(), mesh.core().num_polys());
    Ok(())
}

#[test]
fn test_slice_is_idempotent() -> Result<()> {
    let mut mesh = Primitive::hex_grid([4, 1, 1], 1.0).to_mesh()?;
    let slice = SliceBox::new((0.0, 2.0), (0.0, 1.0), (0.0, 1.0));

    mesh.set_dirty(false);
    mesh.slice(slice);
    assert!(mesh.is_dirty());
    assert_eq!(mesh.core().visible_count(), 2);

    mesh.set_dirty(false);
    mesh.slice(slice);
    assert!(!mesh.is_dirty());
    assert_eq!(mesh.core().visible_count(), 2);
    Ok(())
}

#[test]
fn test_inverted_slice_hides_the_inside() -> Result<()> {
    let mut mesh = Primitive::hex_grid([4, 1, 1], 1.0).to_mesh()?;
    mesh.set_dirty(false);
    mesh.slice(SliceBox::new((0.0, 2.0), (0.0, 1.0), (0.0, 1.0)).inverted(true, false, false));
    let core = mesh.core();
    assert!(!core.is_visible(0) && !core.is_visible(1));
    assert!(core.is_visible(2) && core.is_visible(3));
    Ok(())
}

#[test]
fn test_slice_is_skipped_while_dirty() -> Result<()> {
    let mut mesh = Primitive::hex_grid([4, 1, 1], 1.0).to_mesh()?;
    assert!(mesh.is_dirty());
    mesh.slice(SliceBox::new((0.0, 2.0), (0.0, 1.0), (0.0, 1.0)));
    assert_eq!(mesh.core().visible_count(), 4);
    Ok(())
}

#[test]
fn test_picking() -> Result<()> {
    let mesh = Primitive::hex_grid([2, 1, 1], 1.0).to_mesh()?;
    assert_eq!(mesh.pick_poly(&Point3::new(1.6, 0.5, 0.5)), Some(1));
    let vid = mesh.pick_vertex(&Point3::new(2.1, 1.1, 0.9)).expect("vertex");
    assert_eq!(mesh.core().vertices()[vid], Point3::new(2.0, 1.0, 1.0));

    let fid = mesh.pick_face(&Point3::new(1.0, 0.5, 0.5)).expect("face");
    assert!(!mesh.as_volume().expect("hex grid").face_is_on_surf(fid));
    Ok(())
}

#[test]
fn test_picking_an_empty_mesh() -> Result<()> {
    let mesh = AnyMesh::from(meshview::TriangleMesh::new(Vec::new(), Vec::new(), None)?);
    let origin = Point3::origin();
    assert_eq!(mesh.pick_vertex(&origin), None);
    assert_eq!(mesh.pick_edge(&origin), None);
    assert_eq!(mesh.pick_poly(&origin), None);
    Ok(())
}

#[test]
fn test_surface_dig_toggles_one_poly() -> Result<()> {
    let mut mesh = Primitive::quad_grid(2, 1, 1.0).to_mesh()?;
    let shared = mesh.core().edge_id(1, 4).expect("shared edge");
    assert_eq!(mesh.dig(shared), Some(0));
    assert_eq!(mesh.dig(shared), Some(1));
    assert_eq!(mesh.dig(shared), None);
    assert_eq!(mesh.undig(shared), Some(0));
    Ok(())
}
