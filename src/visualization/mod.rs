pub mod kin_vis3d;
