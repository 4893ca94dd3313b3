// Tests module
// Integration: config defaults flowing through projection, genesis and bootstrap
// Projection properties: proptest invariants of the projection engine
// Genesis properties: proptest invariants of the template patch
